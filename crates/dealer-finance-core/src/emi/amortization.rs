use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealerFinanceError;
use crate::schedule::LoanPolicy;
use crate::time_value::{annuity_payment, remaining_balance};
use crate::types::{round_currency, round_percent, with_metadata, ComputationOutput, Money, Rate};
use crate::DealerFinanceResult;

/// Loan parameters as entered on the finance form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiInput {
    /// Vehicle price being financed
    pub principal: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// Annual interest rate in percent (9.5 = 9.5% p.a.)
    pub interest_rate: Decimal,
    #[serde(alias = "tenure")]
    pub tenure_months: u32,
}

/// One month of the amortization preview, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub emi: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiResult {
    pub loan_amount: Money,
    pub monthly_rate: Rate,
    pub emi: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    /// Total interest as a percentage of the loan amount, 2 dp
    pub effective_rate: Decimal,
    pub effective_rate_display: String,
    /// Outstanding principal once the preview months are paid
    pub balance_after_preview: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// EMI with the site's default loan bounds.
pub fn calculate_emi(input: &EmiInput) -> DealerFinanceResult<ComputationOutput<EmiResult>> {
    calculate_emi_with_policy(input, &LoanPolicy::default())
}

/// Equated monthly installment under the reducing-balance method.
///
/// EMI = L * r * (1+r)^n / ((1+r)^n - 1), with r = annual% / 100 / 12 and
/// L = principal - down payment. A zero rate degenerates to L / n.
///
/// Headline figures are rounded to whole rupees. The preview schedule is
/// driven by the unrounded EMI and carries the unrounded balance from month
/// to month; only the emitted rows are rounded.
pub fn calculate_emi_with_policy(
    input: &EmiInput,
    policy: &LoanPolicy,
) -> DealerFinanceResult<ComputationOutput<EmiResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input, policy)?;

    let loan_amount = input.principal - input.down_payment;
    let monthly_rate = input.interest_rate / dec!(100) / dec!(12);
    let n = Decimal::from(input.tenure_months);

    let exact_emi = annuity_payment(monthly_rate, input.tenure_months, loan_amount)?;
    let (exact_payment, exact_interest) = if monthly_rate.is_zero() {
        (loan_amount, Decimal::ZERO)
    } else {
        let payment = exact_emi * n;
        (payment, payment - loan_amount)
    };

    let effective_rate = round_percent(exact_interest / loan_amount * dec!(100));

    let schedule = build_schedule(
        loan_amount,
        monthly_rate,
        exact_emi,
        input.tenure_months,
        policy,
    );
    let preview = input.tenure_months.min(policy.preview_months);
    let balance_after_preview =
        round_currency(remaining_balance(monthly_rate, preview, loan_amount, exact_emi))
            .max(Decimal::ZERO);

    if input.tenure_months > policy.preview_months {
        warnings.push(format!(
            "Schedule shows the first {} of {} months",
            policy.preview_months, input.tenure_months
        ));
    }
    if input.down_payment.is_zero() {
        warnings.push("No down payment — full vehicle price is financed".into());
    }

    tracing::debug!(
        loan_amount = %loan_amount,
        interest_rate = %input.interest_rate,
        tenure_months = input.tenure_months,
        emi = %exact_emi,
        "computed EMI"
    );

    let output = EmiResult {
        loan_amount,
        monthly_rate,
        emi: round_currency(exact_emi),
        total_interest: round_currency(exact_interest),
        total_payment: round_currency(exact_payment),
        effective_rate,
        effective_rate_display: format!("{:.2}", effective_rate),
        balance_after_preview,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI (reducing-balance annuity) with amortization preview",
        &serde_json::json!({
            "loan_amount": loan_amount.to_string(),
            "monthly_rate": monthly_rate.to_string(),
            "tenure_months": input.tenure_months,
            "preview_months": policy.preview_months,
            "schedule_precision": "unrounded EMI and balance carried between months",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate(input: &EmiInput, policy: &LoanPolicy) -> DealerFinanceResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(DealerFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(DealerFinanceError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if input.down_payment >= input.principal {
        return Err(DealerFinanceError::invalid(
            "down_payment",
            "Down payment must be less than the principal",
        ));
    }
    if input.interest_rate < Decimal::ZERO || input.interest_rate > policy.max_interest_rate {
        return Err(DealerFinanceError::invalid(
            "interest_rate",
            format!(
                "Interest rate must be between 0 and {}% p.a.",
                policy.max_interest_rate
            ),
        ));
    }
    if input.tenure_months < policy.min_tenure_months
        || input.tenure_months > policy.max_tenure_months
    {
        return Err(DealerFinanceError::invalid(
            "tenure_months",
            format!(
                "Tenure must be between {} and {} months",
                policy.min_tenure_months, policy.max_tenure_months
            ),
        ));
    }
    Ok(())
}

fn build_schedule(
    loan_amount: Money,
    monthly_rate: Rate,
    exact_emi: Money,
    tenure_months: u32,
    policy: &LoanPolicy,
) -> Vec<AmortizationRow> {
    let months = tenure_months.min(policy.preview_months);
    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = loan_amount;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal = exact_emi - interest;
        balance -= principal;

        rows.push(AmortizationRow {
            month,
            emi: round_currency(exact_emi),
            principal_component: round_currency(principal),
            interest_component: round_currency(interest),
            // drift near payoff must not show as a negative balance
            remaining_balance: round_currency(balance).max(Decimal::ZERO),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(principal: Money, down: Money, rate: Decimal, tenure: u32) -> EmiInput {
        EmiInput {
            principal,
            down_payment: down,
            interest_rate: rate,
            tenure_months: tenure,
        }
    }

    #[test]
    fn test_known_answer_eight_lakh_five_years() {
        let out = calculate_emi(&input(dec!(1000000), dec!(200000), dec!(9.5), 60)).unwrap();
        let r = &out.result;
        assert_eq!(r.loan_amount, dec!(800000));
        assert!((r.monthly_rate - dec!(0.0079167)).abs() < dec!(0.0000001));
        assert_eq!(r.emi, dec!(16801));
        assert!((r.total_payment - dec!(1008089)).abs() <= dec!(1));
        assert!((r.total_interest - dec!(208089)).abs() <= dec!(1));
        assert_eq!(r.effective_rate, dec!(26.01));
        assert_eq!(r.effective_rate_display, "26.01");
        assert_eq!(r.schedule.len(), 12);
    }

    #[test]
    fn test_first_row_split() {
        let out = calculate_emi(&input(dec!(1000000), dec!(200000), dec!(9.5), 60)).unwrap();
        let first = &out.result.schedule[0];
        // 800,000 * 0.0079166.. = 6,333.33 interest in month one
        assert_eq!(first.month, 1);
        assert_eq!(first.interest_component, dec!(6333));
        assert_eq!(first.principal_component, dec!(10468));
        assert_eq!(first.remaining_balance, dec!(789532));
    }

    #[test]
    fn test_zero_interest() {
        let out = calculate_emi(&input(dec!(500000), dec!(100000), dec!(0), 7)).unwrap();
        let r = &out.result;
        // 400,000 / 7 = 57,142.857 rounds to 57,143
        assert_eq!(r.emi, dec!(57143));
        assert_eq!(r.total_interest, Decimal::ZERO);
        assert_eq!(r.total_payment, dec!(400000));
        assert_eq!(r.effective_rate, Decimal::ZERO);
        assert_eq!(r.effective_rate_display, "0.00");
        assert_eq!(r.schedule.len(), 7);
        assert_eq!(r.schedule[6].remaining_balance, Decimal::ZERO);
        assert!(r.schedule.iter().all(|row| row.interest_component.is_zero()));
    }

    #[test]
    fn test_short_tenure_pays_off() {
        let out = calculate_emi(&input(dec!(300000), dec!(50000), dec!(12), 6)).unwrap();
        let r = &out.result;
        assert_eq!(r.schedule.len(), 6);
        assert!(r.schedule.last().unwrap().remaining_balance <= dec!(1));
        assert_eq!(r.balance_after_preview, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_truncated_to_preview() {
        let out = calculate_emi(&input(dec!(900000), dec!(0), dec!(10), 84)).unwrap();
        assert_eq!(out.result.schedule.len(), 12);
        assert_eq!(out.result.schedule[11].month, 12);
        assert!(out.warnings.iter().any(|w| w.contains("first 12 of 84")));
    }

    #[test]
    fn test_balance_after_preview_matches_last_row() {
        let out = calculate_emi(&input(dec!(900000), dec!(100000), dec!(8.75), 48)).unwrap();
        let r = &out.result;
        let last = r.schedule.last().unwrap().remaining_balance;
        assert!((last - r.balance_after_preview).abs() <= dec!(1));
    }

    #[test]
    fn test_down_payment_equal_to_principal_rejected() {
        let err = calculate_emi(&input(dec!(500000), dec!(500000), dec!(9), 12)).unwrap_err();
        assert_eq!(err.field(), Some("down_payment"));
    }

    #[test]
    fn test_negative_down_payment_rejected() {
        let err = calculate_emi(&input(dec!(500000), dec!(-1), dec!(9), 12)).unwrap_err();
        assert_eq!(err.field(), Some("down_payment"));
    }

    #[test]
    fn test_non_positive_principal_rejected() {
        let err = calculate_emi(&input(dec!(0), dec!(0), dec!(9), 12)).unwrap_err();
        assert_eq!(err.field(), Some("principal"));
    }

    #[test]
    fn test_rate_bounds() {
        assert!(calculate_emi(&input(dec!(500000), dec!(0), dec!(50), 12)).is_ok());
        let err = calculate_emi(&input(dec!(500000), dec!(0), dec!(50.01), 12)).unwrap_err();
        assert_eq!(err.field(), Some("interest_rate"));
        let err = calculate_emi(&input(dec!(500000), dec!(0), dec!(-0.5), 12)).unwrap_err();
        assert_eq!(err.field(), Some("interest_rate"));
    }

    #[test]
    fn test_tenure_bounds() {
        assert!(calculate_emi(&input(dec!(500000), dec!(0), dec!(9), 1)).is_ok());
        assert!(calculate_emi(&input(dec!(500000), dec!(0), dec!(9), 84)).is_ok());
        let err = calculate_emi(&input(dec!(500000), dec!(0), dec!(9), 0)).unwrap_err();
        assert_eq!(err.field(), Some("tenure_months"));
        let err = calculate_emi(&input(dec!(500000), dec!(0), dec!(9), 85)).unwrap_err();
        assert_eq!(err.field(), Some("tenure_months"));
    }

    #[test]
    fn test_single_month_tenure() {
        let out = calculate_emi(&input(dec!(120000), dec!(20000), dec!(12), 1)).unwrap();
        let r = &out.result;
        // one month at 1%: 100,000 * 1.01
        assert_eq!(r.emi, dec!(101000));
        assert_eq!(r.total_interest, dec!(1000));
        assert_eq!(r.schedule.len(), 1);
        assert_eq!(r.schedule[0].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_custom_policy_preview_and_bounds() {
        let policy = LoanPolicy {
            preview_months: 3,
            max_tenure_months: 120,
            ..LoanPolicy::default()
        };
        let out = calculate_emi_with_policy(&input(dec!(2000000), dec!(0), dec!(8), 120), &policy)
            .unwrap();
        assert_eq!(out.result.schedule.len(), 3);
    }

    #[test]
    fn test_tenure_alias_in_json() {
        let parsed: EmiInput = serde_json::from_str(
            r#"{"principal": 1000000, "downPayment": 200000, "interestRate": 9.5, "tenure": 60}"#,
        )
        .unwrap();
        assert_eq!(parsed.tenure_months, 60);
        assert_eq!(parsed.down_payment, dec!(200000));
    }
}
