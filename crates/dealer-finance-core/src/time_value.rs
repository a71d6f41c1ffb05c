use rust_decimal::Decimal;

use crate::error::DealerFinanceError;
use crate::types::{Money, Rate};
use crate::DealerFinanceResult;

/// `(1 + rate)^periods` by repeated multiplication.
/// Avoids `powd()` precision drift; loan tenures are short enough that the loop is cheap.
pub fn compound_factor(rate: Rate, periods: u32) -> Decimal {
    let one_plus_r = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..periods {
        result *= one_plus_r;
    }
    result
}

/// Level payment that retires `principal` over `periods` at a per-period `rate`.
///
/// Reducing-balance annuity: `P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n`
/// when the rate is zero. Returned unrounded.
pub fn annuity_payment(rate: Rate, periods: u32, principal: Money) -> DealerFinanceResult<Money> {
    if periods == 0 {
        return Err(DealerFinanceError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound_factor(rate, periods);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DealerFinanceError::invalid(
            "rate",
            "Periodic rate too small to amortise over the given periods",
        ));
    }

    Ok(principal * rate * factor / denominator)
}

/// Outstanding balance after `paid` level payments of `payment`.
pub fn remaining_balance(rate: Rate, paid: u32, principal: Money, payment: Money) -> Money {
    if rate.is_zero() {
        return principal - payment * Decimal::from(paid);
    }
    let factor = compound_factor(rate, paid);
    principal * factor - payment * (factor - Decimal::ONE) / rate
}
