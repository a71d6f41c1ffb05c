use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::pricing::{self, InsuranceType, OnRoadRequest, PricingOptions};
use dealer_finance_core::schedule::DealerConfig;
use dealer_finance_core::FuelType;

use crate::input;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFuelType {
    Petrol,
    Diesel,
    Ev,
}

impl From<CliFuelType> for FuelType {
    fn from(value: CliFuelType) -> Self {
        match value {
            CliFuelType::Petrol => FuelType::Petrol,
            CliFuelType::Diesel => FuelType::Diesel,
            CliFuelType::Ev => FuelType::Ev,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliInsurance {
    Comprehensive,
    ThirdParty,
    None,
}

impl CliInsurance {
    /// `(include_insurance, insurance_type)` for the core options.
    pub fn cover(self) -> (bool, InsuranceType) {
        match self {
            CliInsurance::Comprehensive => (true, InsuranceType::Comprehensive),
            CliInsurance::ThirdParty => (true, InsuranceType::ThirdParty),
            CliInsurance::None => (false, InsuranceType::Comprehensive),
        }
    }
}

/// Arguments for an on-road price breakdown
#[derive(Args)]
pub struct OnRoadArgs {
    /// Ex-showroom price in rupees
    #[arg(long, alias = "ex-showroom")]
    pub price: Option<Decimal>,

    /// Insurance cover to include
    #[arg(long, value_enum, default_value = "comprehensive")]
    pub insurance: CliInsurance,

    /// Fuel type (drives the third-party premium)
    #[arg(long, value_enum, default_value = "petrol")]
    pub fuel: CliFuelType,

    /// Purchase is financed (adds hypothecation)
    #[arg(long)]
    pub financed: bool,

    /// Total of accessories fitted at the dealership
    #[arg(long, default_value = "0")]
    pub accessories: Decimal,

    /// Skip tax collected at source
    #[arg(long)]
    pub no_tcs: bool,

    /// Path to JSON/YAML input file: {"exShowroomPrice": .., "options": {..}}
    #[arg(long)]
    pub input: Option<String>,
}

impl OnRoadArgs {
    fn options(&self) -> PricingOptions {
        let (include_insurance, insurance_type) = self.insurance.cover();
        PricingOptions::new()
            .include_insurance(include_insurance)
            .insurance_type(insurance_type)
            .fuel_type(self.fuel.into())
            .financed(self.financed)
            .accessories_total(self.accessories)
            .include_tcs(!self.no_tcs)
    }
}

pub fn run_on_road(
    args: OnRoadArgs,
    config: &DealerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: OnRoadRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(price) = args.price {
        OnRoadRequest {
            ex_showroom_price: price,
            options: args.options(),
        }
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        return Err("--price is required (or provide --input / stdin)".into());
    };

    let result = pricing::calculate_on_road_price_with_schedule(
        request.ex_showroom_price,
        &request.options,
        &config.pricing,
    )?;
    Ok(serde_json::to_value(result)?)
}
