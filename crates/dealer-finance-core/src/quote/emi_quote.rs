use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::emi::{calculate_emi_with_policy, AmortizationRow, EmiInput};
use crate::error::DealerFinanceError;
use crate::schedule::LoanPolicy;
use crate::types::Money;
use crate::DealerFinanceResult;

/// Body posted by the site's EMI calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuoteRequest {
    pub principal: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub interest_rate: Decimal,
    #[serde(alias = "tenureMonths")]
    pub tenure: u32,
}

impl From<&EmiQuoteRequest> for EmiInput {
    fn from(req: &EmiQuoteRequest) -> Self {
        EmiInput {
            principal: req.principal,
            down_payment: req.down_payment,
            interest_rate: req.interest_rate,
            tenure_months: req.tenure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiSummary {
    pub emi: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    /// Two-decimal display string, e.g. "26.01"
    pub effective_rate: String,
}

/// Response body for a successful EMI quote (HTTP 200 at the site).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuoteResponse {
    pub input: EmiQuoteRequest,
    pub result: EmiSummary,
    pub schedule: Vec<AmortizationRow>,
    pub disclaimer: String,
}

/// Response body for rejected input (HTTP 400 at the site).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub error: String,
    pub field: String,
    pub reason: String,
}

impl ValidationErrorBody {
    /// Wire body for an input error, with the field named as the form names it.
    /// `None` for anything that is not a caller input error.
    pub fn from_error(err: &DealerFinanceError) -> Option<Self> {
        match err {
            DealerFinanceError::InvalidInput { field, reason } => Some(ValidationErrorBody {
                error: "validation_error".into(),
                field: wire_field_name(field).to_string(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

fn wire_field_name(field: &str) -> &str {
    match field {
        "down_payment" => "downPayment",
        "interest_rate" => "interestRate",
        "tenure_months" => "tenure",
        "ex_showroom_price" => "exShowroomPrice",
        "accessories_total" => "accessoriesTotal",
        other => other,
    }
}

/// Run the EMI calculation and shape it for the calculator form.
pub fn emi_quote(
    request: &EmiQuoteRequest,
    policy: &LoanPolicy,
) -> DealerFinanceResult<EmiQuoteResponse> {
    let output = calculate_emi_with_policy(&EmiInput::from(request), policy)?;
    let r = output.result;

    Ok(EmiQuoteResponse {
        input: request.clone(),
        result: EmiSummary {
            emi: r.emi,
            total_interest: r.total_interest,
            total_payment: r.total_payment,
            effective_rate: r.effective_rate_display,
        },
        schedule: r.schedule,
        disclaimer: policy.disclaimer.clone(),
    })
}
