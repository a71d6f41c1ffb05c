use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::quote::{
    build_finance_quote, build_on_road_quote, FinanceQuoteRequest, OnRoadQuoteRequest,
};
use dealer_finance_core::schedule::DealerConfig;

use super::pricing::CliInsurance;
use crate::input;

/// Arguments for a catalog-priced on-road quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to the price catalog (YAML or JSON)
    #[arg(long)]
    pub catalog: String,

    /// Model slug, e.g. "creta"
    #[arg(long)]
    pub model: Option<String>,

    /// Variant id within the model
    #[arg(long)]
    pub variant: Option<String>,

    /// Paint option code
    #[arg(long)]
    pub color: Option<String>,

    /// Accessory id (repeatable, or comma-separated)
    #[arg(long = "accessory", value_delimiter = ',')]
    pub accessories: Vec<String>,

    /// Purchase is financed (adds hypothecation)
    #[arg(long)]
    pub financed: bool,

    /// Insurance cover to include
    #[arg(long, value_enum, default_value = "comprehensive")]
    pub insurance: CliInsurance,

    /// Skip tax collected at source
    #[arg(long)]
    pub no_tcs: bool,

    /// Path to JSON/YAML request body (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a catalog-priced finance quote
#[derive(Args)]
pub struct FinanceArgs {
    #[command(flatten)]
    pub vehicle: QuoteArgs,

    /// Down payment against the on-road total
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<u32>,
}

impl QuoteArgs {
    fn request_from_flags(
        &self,
    ) -> Result<Option<OnRoadQuoteRequest>, Box<dyn std::error::Error>> {
        let Some(model_slug) = self.model.clone() else {
            return Ok(None);
        };
        let variant_id = self
            .variant
            .clone()
            .ok_or("--variant is required with --model")?;
        let (include_insurance, insurance_type) = self.insurance.cover();
        Ok(Some(OnRoadQuoteRequest {
            model_slug,
            variant_id,
            color_code: self.color.clone(),
            accessories: self.accessories.clone(),
            is_financed: self.financed,
            insurance_type,
            include_insurance,
            include_tcs: !self.no_tcs,
        }))
    }
}

pub fn run_quote(
    args: QuoteArgs,
    config: &DealerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = input::config::load_catalog(&args.catalog)?;
    let request: OnRoadQuoteRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(req) = args.request_from_flags()? {
        req
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        return Err("--model and --variant are required (or provide --input / stdin)".into());
    };

    let result = build_on_road_quote(&request, &catalog, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_finance(
    args: FinanceArgs,
    config: &DealerConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = input::config::load_catalog(&args.vehicle.catalog)?;
    let request: FinanceQuoteRequest = if let Some(ref path) = args.vehicle.input {
        input::file::read_document(path)?
    } else if let Some(vehicle) = args.vehicle.request_from_flags()? {
        FinanceQuoteRequest {
            vehicle,
            down_payment: args.down_payment,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure: args.tenure.ok_or("--tenure is required (or provide --input)")?,
        }
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        return Err("--model and --variant are required (or provide --input / stdin)".into());
    };

    let result = build_finance_quote(&request, &catalog, config)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_finance_core::pricing::InsuranceType;

    fn args() -> QuoteArgs {
        QuoteArgs {
            catalog: "catalog.yaml".into(),
            model: Some("creta".into()),
            variant: Some("sx".into()),
            color: None,
            accessories: vec!["mats".into()],
            financed: false,
            insurance: CliInsurance::Comprehensive,
            no_tcs: false,
            input: None,
        }
    }

    #[test]
    fn test_flags_carry_insurance_and_tcs_choices() {
        let mut a = args();
        a.insurance = CliInsurance::None;
        a.no_tcs = true;
        let req = a.request_from_flags().unwrap().unwrap();
        assert!(!req.include_insurance);
        assert!(!req.include_tcs);

        a.insurance = CliInsurance::ThirdParty;
        a.no_tcs = false;
        let req = a.request_from_flags().unwrap().unwrap();
        assert!(req.include_insurance);
        assert_eq!(req.insurance_type, InsuranceType::ThirdParty);
        assert!(req.include_tcs);
    }

    #[test]
    fn test_model_without_variant_is_an_error() {
        let mut a = args();
        a.variant = None;
        assert!(a.request_from_flags().is_err());
        a.model = None;
        assert!(a.request_from_flags().unwrap().is_none());
    }
}
