use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::options::{InsuranceType, PricingOptions};
use crate::error::DealerFinanceError;
use crate::schedule::{PricingSchedule, MAX_AMOUNT};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, Rate};
use crate::DealerFinanceResult;

/// Line items making up the on-road price. Every field is a non-negative
/// amount in whole rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub ex_showroom: Money,
    pub road_tax: Money,
    pub registration: Money,
    pub insurance: Money,
    pub fastag: Money,
    pub hsrp: Money,
    pub handling: Money,
    pub hypothecation: Money,
    pub accessories: Money,
    pub tcs: Money,
}

impl PriceBreakdown {
    pub fn line_items(&self) -> [(&'static str, Money); 10] {
        [
            ("exShowroom", self.ex_showroom),
            ("roadTax", self.road_tax),
            ("registration", self.registration),
            ("insurance", self.insurance),
            ("fastag", self.fastag),
            ("hsrp", self.hsrp),
            ("handling", self.handling),
            ("hypothecation", self.hypothecation),
            ("accessories", self.accessories),
            ("tcs", self.tcs),
        ]
    }

    /// Sum of every line item.
    pub fn total(&self) -> Money {
        self.line_items().iter().map(|(_, amount)| *amount).sum()
    }
}

/// Split of the insurance line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceDetail {
    pub own_damage: Money,
    pub third_party: Money,
    pub personal_accident: Money,
}

impl InsuranceDetail {
    fn none() -> Self {
        InsuranceDetail {
            own_damage: Decimal::ZERO,
            third_party: Decimal::ZERO,
            personal_accident: Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Money {
        self.own_damage + self.third_party + self.personal_accident
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub breakdown: PriceBreakdown,
    pub total: Money,
    pub road_tax_rate: Rate,
    pub insurance_detail: InsuranceDetail,
}

/// On-road price with the default regional schedule.
pub fn calculate_on_road_price(
    ex_showroom_price: Money,
    options: &PricingOptions,
) -> DealerFinanceResult<ComputationOutput<PricingResult>> {
    calculate_on_road_price_with_schedule(ex_showroom_price, options, &PricingSchedule::default())
}

/// On-road price breakdown.
///
/// Road tax and the own-damage premium are flat rates picked by the
/// ex-showroom bracket. Registration, HSRP, FASTag and handling are fixed
/// fees; hypothecation applies only when financed; TCS applies only strictly
/// above the threshold. The total is the sum of the breakdown.
pub fn calculate_on_road_price_with_schedule(
    ex_showroom_price: Money,
    options: &PricingOptions,
    schedule: &PricingSchedule,
) -> DealerFinanceResult<ComputationOutput<PricingResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if ex_showroom_price < Decimal::ZERO {
        return Err(DealerFinanceError::invalid(
            "ex_showroom_price",
            "Ex-showroom price cannot be negative",
        ));
    }
    if options.accessories_total < Decimal::ZERO {
        return Err(DealerFinanceError::invalid(
            "accessories_total",
            "Accessories total cannot be negative",
        ));
    }

    if ex_showroom_price > MAX_AMOUNT {
        return Err(DealerFinanceError::invalid(
            "ex_showroom_price",
            format!("Ex-showroom price cannot exceed {MAX_AMOUNT}"),
        ));
    }
    if options.accessories_total > MAX_AMOUNT {
        return Err(DealerFinanceError::invalid(
            "accessories_total",
            format!("Accessories total cannot exceed {MAX_AMOUNT}"),
        ));
    }
    schedule.validate()?;

    if ex_showroom_price.is_zero() {
        warnings.push("Ex-showroom price is zero — only fixed fees are charged".into());
    }

    let road_tax_rate = schedule.road_tax.rate_for(ex_showroom_price);
    let road_tax = round_currency(ex_showroom_price * road_tax_rate);

    let insurance_detail = insurance_premium(ex_showroom_price, options, schedule);

    let hypothecation = if options.is_financed {
        schedule.hypothecation
    } else {
        Decimal::ZERO
    };

    let tcs = if options.include_tcs && ex_showroom_price > schedule.tcs_threshold {
        round_currency(ex_showroom_price * schedule.tcs_rate)
    } else {
        Decimal::ZERO
    };

    let breakdown = PriceBreakdown {
        ex_showroom: ex_showroom_price,
        road_tax,
        registration: schedule.registration.total(),
        insurance: insurance_detail.total(),
        fastag: schedule.fastag,
        hsrp: schedule.hsrp,
        handling: schedule.handling,
        hypothecation,
        accessories: options.accessories_total,
        tcs,
    };
    let total = breakdown.total();

    tracing::debug!(
        ex_showroom = %ex_showroom_price,
        road_tax_rate = %road_tax_rate,
        financed = options.is_financed,
        total = %total,
        "computed on-road price"
    );

    let output = PricingResult {
        breakdown,
        total,
        road_tax_rate,
        insurance_detail,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "On-Road Price (flat-rate road tax bracket + fixed RTO and dealer charges)",
        &serde_json::json!({
            "ex_showroom_price": ex_showroom_price.to_string(),
            "road_tax_rate": road_tax_rate.to_string(),
            "insurance_type": options.insurance_type,
            "include_insurance": options.include_insurance,
            "fuel_type": options.fuel_type,
            "is_financed": options.is_financed,
            "include_tcs": options.include_tcs,
            "tcs_threshold": schedule.tcs_threshold.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn insurance_premium(
    ex_showroom_price: Money,
    options: &PricingOptions,
    schedule: &PricingSchedule,
) -> InsuranceDetail {
    if !options.include_insurance {
        return InsuranceDetail::none();
    }

    let third_party = schedule.third_party.for_fuel(options.fuel_type);
    let own_damage = match options.insurance_type {
        InsuranceType::Comprehensive => {
            round_currency(ex_showroom_price * schedule.own_damage.rate_for(ex_showroom_price))
        }
        InsuranceType::ThirdParty => Decimal::ZERO,
    };

    InsuranceDetail {
        own_damage,
        third_party,
        personal_accident: schedule.personal_accident_cover,
    }
}
