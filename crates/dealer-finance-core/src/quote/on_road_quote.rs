use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::catalog::{AccessoryPrice, PriceCatalog};
use crate::emi::{calculate_emi_with_policy, EmiInput, EmiResult};
use crate::error::DealerFinanceError;
use crate::pricing::{
    calculate_on_road_price_with_schedule, InsuranceType, PricingOptions, PricingResult,
};
use crate::schedule::DealerConfig;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DealerFinanceResult;

fn default_true() -> bool {
    true
}

/// Body posted by a model page's "get on-road price" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRoadQuoteRequest {
    pub model_slug: String,
    pub variant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    /// Accessory ids from the model's accessory list
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub is_financed: bool,
    #[serde(default)]
    pub insurance_type: InsuranceType,
    #[serde(default = "default_true")]
    pub include_insurance: bool,
    #[serde(default = "default_true", alias = "includeTCS")]
    pub include_tcs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRoadQuote {
    pub model_slug: String,
    pub variant_id: String,
    pub variant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    pub base_price: Money,
    pub color_surcharge: Money,
    pub accessories: Vec<AccessoryPrice>,
    pub pricing: PricingResult,
}

/// Resolve catalog prices for the request and price the vehicle on-road.
///
/// The ex-showroom figure is the variant's list price plus the paint
/// surcharge; the fuel type comes from the variant. Repeated accessory ids
/// are charged once.
pub fn build_on_road_quote(
    request: &OnRoadQuoteRequest,
    catalog: &dyn PriceCatalog,
    config: &DealerConfig,
) -> DealerFinanceResult<ComputationOutput<OnRoadQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let variant = catalog
        .variant(&request.model_slug, &request.variant_id)
        .ok_or_else(|| DealerFinanceError::UnknownCatalogEntry {
            kind: "variant".into(),
            id: format!("{}/{}", request.model_slug, request.variant_id),
        })?;

    let color_surcharge = match request.color_code.as_deref() {
        Some(code) => catalog
            .color_surcharge(&request.model_slug, &request.variant_id, code)
            .ok_or_else(|| DealerFinanceError::UnknownCatalogEntry {
                kind: "colour".into(),
                id: format!("{}/{}/{}", request.model_slug, request.variant_id, code),
            })?,
        None => Decimal::ZERO,
    };

    let mut seen = HashSet::new();
    let mut accessories = Vec::with_capacity(request.accessories.len());
    for id in &request.accessories {
        if !seen.insert(id.as_str()) {
            warnings.push(format!("Accessory '{id}' listed more than once; charged once"));
            continue;
        }
        let accessory = catalog
            .accessory(&request.model_slug, id)
            .ok_or_else(|| DealerFinanceError::UnknownCatalogEntry {
                kind: "accessory".into(),
                id: format!("{}/{}", request.model_slug, id),
            })?;
        accessories.push(accessory);
    }
    let accessories_total = accessories
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.price))
        .ok_or_else(|| {
            DealerFinanceError::invalid("accessories_total", "Accessories total is out of range")
        })?;

    let ex_showroom = variant
        .ex_showroom
        .checked_add(color_surcharge)
        .ok_or_else(|| {
            DealerFinanceError::invalid("ex_showroom_price", "Ex-showroom price is out of range")
        })?;
    let options = PricingOptions {
        include_insurance: request.include_insurance,
        insurance_type: request.insurance_type,
        fuel_type: variant.fuel_type,
        is_financed: request.is_financed,
        accessories_total,
        include_tcs: request.include_tcs,
    };

    let priced = calculate_on_road_price_with_schedule(ex_showroom, &options, &config.pricing)?;
    warnings.extend(priced.warnings);

    tracing::debug!(
        model = %request.model_slug,
        variant = %request.variant_id,
        accessories = accessories.len(),
        total = %priced.result.total,
        "built on-road quote"
    );

    let output = OnRoadQuote {
        model_slug: request.model_slug.clone(),
        variant_id: request.variant_id.clone(),
        variant_name: variant.name,
        color_code: request.color_code.clone(),
        base_price: variant.ex_showroom,
        color_surcharge,
        accessories,
        pricing: priced.result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "On-Road Quote (catalog price + colour surcharge, priced on-road)",
        &serde_json::json!({
            "model_slug": request.model_slug,
            "variant_id": request.variant_id,
            "fuel_type": options.fuel_type,
            "ex_showroom_price": ex_showroom.to_string(),
            "accessories_total": accessories_total.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// On-road quote plus a loan on the full on-road amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceQuoteRequest {
    #[serde(flatten)]
    pub vehicle: OnRoadQuoteRequest,
    #[serde(default)]
    pub down_payment: Money,
    pub interest_rate: Decimal,
    #[serde(alias = "tenureMonths")]
    pub tenure: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceQuote {
    pub on_road: OnRoadQuote,
    pub loan: EmiResult,
}

/// Price the vehicle as a financed purchase, then amortize the on-road total
/// less the down payment. Hypothecation is always charged here.
pub fn build_finance_quote(
    request: &FinanceQuoteRequest,
    catalog: &dyn PriceCatalog,
    config: &DealerConfig,
) -> DealerFinanceResult<ComputationOutput<FinanceQuote>> {
    let start = Instant::now();

    let mut vehicle = request.vehicle.clone();
    vehicle.is_financed = true;
    let on_road = build_on_road_quote(&vehicle, catalog, config)?;

    let emi_input = EmiInput {
        principal: on_road.result.pricing.total,
        down_payment: request.down_payment,
        interest_rate: request.interest_rate,
        tenure_months: request.tenure,
    };
    let loan = calculate_emi_with_policy(&emi_input, &config.loan)?;

    let mut warnings = on_road.warnings;
    warnings.extend(loan.warnings);

    let output = FinanceQuote {
        on_road: on_road.result,
        loan: loan.result,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Finance Quote (on-road price financed on reducing-balance EMI)",
        &serde_json::json!({
            "principal": emi_input.principal.to_string(),
            "down_payment": emi_input.down_payment.to_string(),
            "interest_rate": emi_input.interest_rate.to_string(),
            "tenure_months": emi_input.tenure_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}
