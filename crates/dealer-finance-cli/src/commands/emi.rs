use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::emi::{self, EmiInput};
use dealer_finance_core::quote::{emi_quote, EmiQuoteRequest};
use dealer_finance_core::schedule::DealerConfig;

use crate::input;

/// Arguments for an EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Vehicle price being financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "tenure-months")]
    pub tenure: Option<u32>,

    /// Emit the calculator form's response body instead of the full computation
    #[arg(long)]
    pub form: bool,

    /// Path to JSON/YAML input file: {"principal", "downPayment", "interestRate", "tenure"}
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs, config: &DealerConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EmiQuoteRequest = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(principal) = args.principal {
        EmiQuoteRequest {
            principal,
            down_payment: args.down_payment,
            interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            tenure: args.tenure.ok_or("--tenure is required (or provide --input)")?,
        }
    } else if let Some(req) = input::stdin::read_stdin()? {
        req
    } else {
        return Err("--principal is required (or provide --input / stdin)".into());
    };

    if args.form {
        let response = emi_quote(&request, &config.loan)?;
        return Ok(serde_json::to_value(response)?);
    }

    let result = emi::calculate_emi_with_policy(&EmiInput::from(&request), &config.loan)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> EmiArgs {
        EmiArgs {
            principal: Some(dec!(1000000)),
            down_payment: dec!(200000),
            rate: Some(dec!(9.5)),
            tenure: Some(60),
            form: false,
            input: None,
        }
    }

    #[test]
    fn test_run_emi_envelope() {
        let value = run_emi(args(), &DealerConfig::default()).unwrap();
        assert_eq!(value["result"]["emi"], "16801");
        assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_run_emi_form_body() {
        let mut a = args();
        a.form = true;
        let value = run_emi(a, &DealerConfig::default()).unwrap();
        assert_eq!(value["result"]["effectiveRate"], "26.01");
        assert!(value.get("disclaimer").is_some());
    }

    #[test]
    fn test_missing_rate_is_reported() {
        let mut a = args();
        a.rate = None;
        let err = run_emi(a, &DealerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--rate"));
    }
}
