use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{FuelType, Money};

/// Motor insurance cover quoted with the vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsuranceType {
    /// Own damage + third party + personal accident
    #[default]
    Comprehensive,
    /// Statutory third party + personal accident only
    #[serde(alias = "third_party", alias = "third-party")]
    ThirdParty,
}

fn default_true() -> bool {
    true
}

/// Options for an on-road price computation.
///
/// Every field has a default, so a JSON body may omit any of them:
/// insurance included (comprehensive), petrol, not financed, no accessories,
/// TCS applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptions {
    #[serde(default = "default_true")]
    pub include_insurance: bool,
    #[serde(default)]
    pub insurance_type: InsuranceType,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default)]
    pub is_financed: bool,
    #[serde(default)]
    pub accessories_total: Money,
    #[serde(default = "default_true", alias = "includeTCS")]
    pub include_tcs: bool,
}

impl Default for PricingOptions {
    fn default() -> Self {
        PricingOptions {
            include_insurance: true,
            insurance_type: InsuranceType::Comprehensive,
            fuel_type: FuelType::Petrol,
            is_financed: false,
            accessories_total: Decimal::ZERO,
            include_tcs: true,
        }
    }
}

impl PricingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_insurance(mut self, include: bool) -> Self {
        self.include_insurance = include;
        self
    }

    pub fn insurance_type(mut self, insurance_type: InsuranceType) -> Self {
        self.insurance_type = insurance_type;
        self
    }

    pub fn fuel_type(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    pub fn financed(mut self, is_financed: bool) -> Self {
        self.is_financed = is_financed;
        self
    }

    pub fn accessories_total(mut self, total: Money) -> Self {
        self.accessories_total = total;
        self
    }

    pub fn include_tcs(mut self, include: bool) -> Self {
        self.include_tcs = include;
        self
    }
}

/// Request body for a bare on-road price: a price plus options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRoadRequest {
    #[serde(alias = "price")]
    pub ex_showroom_price: Money,
    #[serde(default)]
    pub options: PricingOptions,
}
