use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DealerFinanceError;
use crate::types::{FuelType, Money};
use crate::DealerFinanceResult;

/// A variant's list price as the catalog knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    pub name: String,
    #[serde(alias = "ex_showroom")]
    pub ex_showroom: Money,
    #[serde(alias = "fuel_type")]
    pub fuel_type: FuelType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryPrice {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// Price lookups a quote needs. The site backs this with its CMS; the CLI
/// and tests use [`InMemoryCatalog`].
pub trait PriceCatalog: Send + Sync {
    fn variant(&self, model_slug: &str, variant_id: &str) -> Option<VariantPrice>;

    /// Extra charge for a paint option. `None` when the colour is not offered.
    fn color_surcharge(&self, model_slug: &str, variant_id: &str, color_code: &str)
        -> Option<Money>;

    fn accessory(&self, model_slug: &str, accessory_id: &str) -> Option<AccessoryPrice>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogColor {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surcharge: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "ex_showroom")]
    pub ex_showroom: Money,
    #[serde(default, alias = "fuel_type")]
    pub fuel_type: FuelType,
    #[serde(default)]
    pub colors: Vec<CatalogColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAccessory {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub variants: Vec<CatalogVariant>,
    #[serde(default)]
    pub accessories: Vec<CatalogAccessory>,
}

/// Catalog held in memory, typically loaded from a YAML or JSON export.
/// Keys are camelCase as the site exports them; snake_case is accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryCatalog {
    pub models: Vec<CatalogModel>,
}

impl InMemoryCatalog {
    pub fn new(models: Vec<CatalogModel>) -> Self {
        InMemoryCatalog { models }
    }

    pub fn from_yaml_str(contents: &str) -> DealerFinanceResult<Self> {
        let catalog: InMemoryCatalog = serde_yaml::from_str(contents)?;
        catalog.validate()?;
        tracing::debug!(models = catalog.models.len(), "loaded price catalog");
        Ok(catalog)
    }

    pub fn validate(&self) -> DealerFinanceResult<()> {
        for model in &self.models {
            for variant in &model.variants {
                if variant.ex_showroom < Decimal::ZERO {
                    return Err(DealerFinanceError::ConfigError(format!(
                        "{}/{}: ex-showroom price cannot be negative",
                        model.slug, variant.id
                    )));
                }
                if let Some(color) = variant.colors.iter().find(|c| c.surcharge < Decimal::ZERO) {
                    return Err(DealerFinanceError::ConfigError(format!(
                        "{}/{}/{}: colour surcharge cannot be negative",
                        model.slug, variant.id, color.code
                    )));
                }
            }
            if let Some(acc) = model.accessories.iter().find(|a| a.price < Decimal::ZERO) {
                return Err(DealerFinanceError::ConfigError(format!(
                    "{}/{}: accessory price cannot be negative",
                    model.slug, acc.id
                )));
            }
        }
        Ok(())
    }

    fn model(&self, slug: &str) -> Option<&CatalogModel> {
        self.models.iter().find(|m| m.slug == slug)
    }

    fn find_variant(&self, model_slug: &str, variant_id: &str) -> Option<&CatalogVariant> {
        self.model(model_slug)?
            .variants
            .iter()
            .find(|v| v.id == variant_id)
    }
}

impl PriceCatalog for InMemoryCatalog {
    fn variant(&self, model_slug: &str, variant_id: &str) -> Option<VariantPrice> {
        self.find_variant(model_slug, variant_id).map(|v| VariantPrice {
            name: v.name.clone(),
            ex_showroom: v.ex_showroom,
            fuel_type: v.fuel_type,
        })
    }

    fn color_surcharge(
        &self,
        model_slug: &str,
        variant_id: &str,
        color_code: &str,
    ) -> Option<Money> {
        self.find_variant(model_slug, variant_id)?
            .colors
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(color_code))
            .map(|c| c.surcharge)
    }

    fn accessory(&self, model_slug: &str, accessory_id: &str) -> Option<AccessoryPrice> {
        self.model(model_slug)?
            .accessories
            .iter()
            .find(|a| a.id == accessory_id)
            .map(|a| AccessoryPrice {
                id: a.id.clone(),
                name: a.name.clone(),
                price: a.price,
            })
    }
}
