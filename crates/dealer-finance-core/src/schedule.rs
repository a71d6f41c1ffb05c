//! Fee tables, tax brackets and loan bounds.
//!
//! Every constant the pricing engine and the EMI amortizer use lives here,
//! with `Default` impls carrying the current regional schedule. A dealer
//! config file (YAML or JSON) can override any part of it:
//!
//! ```yaml
//! pricing:
//!   hsrp: 650
//!   road_tax:
//!     - { below: 500000, rate: 0.12 }
//!     - { rate: 0.15 }
//! loan:
//!   max_tenure_months: 96
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DealerFinanceError;
use crate::types::{FuelType, Money, Rate};
use crate::DealerFinanceResult;

// ---------------------------------------------------------------------------
// Bracket tables
// ---------------------------------------------------------------------------

/// One row of a flat-rate bracket table. `below: None` marks the open top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<Money>,
    pub rate: Rate,
}

impl RateBracket {
    pub fn below(bound: Money, rate: Rate) -> Self {
        RateBracket {
            below: Some(bound),
            rate,
        }
    }

    pub fn open(rate: Rate) -> Self {
        RateBracket { below: None, rate }
    }
}

/// Ordered bracket table. The whole amount is taxed at the single rate of
/// the bracket it falls into; this is not a marginal system.
///
/// Brackets are half-open: `[previous bound, below)`. An amount equal to a
/// bound belongs to the next bracket up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateBracketTable(pub Vec<RateBracket>);

impl RateBracketTable {
    pub fn new(brackets: Vec<RateBracket>) -> Self {
        RateBracketTable(brackets)
    }

    pub fn brackets(&self) -> &[RateBracket] {
        &self.0
    }

    /// Rate of the first bracket whose upper bound lies strictly above `amount`.
    pub fn rate_for(&self, amount: Money) -> Rate {
        self.0
            .iter()
            .find(|b| b.below.map_or(true, |bound| amount < bound))
            .or_else(|| self.0.last())
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }

    fn validate(&self, name: &str) -> DealerFinanceResult<()> {
        if self.0.is_empty() {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "{name}: at least one bracket is required"
            )));
        }
        let last = self.0.len() - 1;
        let mut previous: Option<Money> = None;
        for (i, bracket) in self.0.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(DealerFinanceError::InvalidSchedule(format!(
                    "{name}[{i}]: rate {} is outside [0, 1]",
                    bracket.rate
                )));
            }
            match bracket.below {
                Some(bound) => {
                    if let Some(prev) = previous {
                        if bound <= prev {
                            return Err(DealerFinanceError::InvalidSchedule(format!(
                                "{name}[{i}]: bound {bound} must be above {prev}"
                            )));
                        }
                    }
                    previous = Some(bound);
                }
                None if i != last => {
                    return Err(DealerFinanceError::InvalidSchedule(format!(
                        "{name}[{i}]: only the last bracket may be open-ended"
                    )));
                }
                None => {}
            }
        }
        if self.0[last].below.is_some() {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "{name}: the last bracket must be open-ended"
            )));
        }
        Ok(())
    }
}

/// Largest price or fee the engine accepts (one lakh crore rupees). Keeps
/// every product and sum in the breakdown well inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

// ---------------------------------------------------------------------------
// Fixed fees
// ---------------------------------------------------------------------------

/// RTO registration components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationFees {
    pub basic: Money,
    pub smart_card: Money,
    pub temporary: Money,
}

impl RegistrationFees {
    pub fn total(&self) -> Money {
        self.basic + self.smart_card + self.temporary
    }
}

impl Default for RegistrationFees {
    fn default() -> Self {
        RegistrationFees {
            basic: dec!(600),
            smart_card: dec!(200),
            temporary: dec!(150),
        }
    }
}

/// Fixed third-party premium by fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThirdPartyPremiums {
    pub petrol: Money,
    pub diesel: Money,
    pub ev: Money,
}

impl ThirdPartyPremiums {
    pub fn for_fuel(&self, fuel: FuelType) -> Money {
        match fuel {
            FuelType::Petrol => self.petrol,
            FuelType::Diesel => self.diesel,
            FuelType::Ev => self.ev,
        }
    }
}

impl Default for ThirdPartyPremiums {
    fn default() -> Self {
        ThirdPartyPremiums {
            petrol: dec!(2094),
            diesel: dec!(2094),
            ev: dec!(1650),
        }
    }
}

// ---------------------------------------------------------------------------
// Pricing schedule
// ---------------------------------------------------------------------------

/// Everything the on-road price depends on besides the vehicle price itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSchedule {
    /// Life-time road tax, flat rate by ex-showroom bracket
    pub road_tax: RateBracketTable,
    /// Comprehensive own-damage premium rate by ex-showroom bracket
    pub own_damage: RateBracketTable,
    pub registration: RegistrationFees,
    pub hsrp: Money,
    pub fastag: Money,
    pub handling: Money,
    /// Bank lien registration, charged only on financed purchases
    pub hypothecation: Money,
    pub third_party: ThirdPartyPremiums,
    pub personal_accident_cover: Money,
    /// TCS applies strictly above this ex-showroom price
    pub tcs_threshold: Money,
    pub tcs_rate: Rate,
}

impl Default for PricingSchedule {
    fn default() -> Self {
        PricingSchedule {
            road_tax: RateBracketTable::new(vec![
                RateBracket::below(dec!(500000), dec!(0.13)),
                RateBracket::below(dec!(1000000), dec!(0.14)),
                RateBracket::below(dec!(1500000), dec!(0.17)),
                RateBracket::below(dec!(2000000), dec!(0.18)),
                RateBracket::open(dec!(0.20)),
            ]),
            own_damage: RateBracketTable::new(vec![
                RateBracket::below(dec!(1000000), dec!(0.032)),
                RateBracket::below(dec!(2000000), dec!(0.028)),
                RateBracket::open(dec!(0.025)),
            ]),
            registration: RegistrationFees::default(),
            hsrp: dec!(600),
            fastag: dec!(500),
            handling: dec!(3000),
            hypothecation: dec!(1500),
            third_party: ThirdPartyPremiums::default(),
            personal_accident_cover: dec!(750),
            tcs_threshold: dec!(1000000),
            tcs_rate: dec!(0.01),
        }
    }
}

impl PricingSchedule {
    pub fn validate(&self) -> DealerFinanceResult<()> {
        self.road_tax.validate("road_tax")?;
        self.own_damage.validate("own_damage")?;

        let fees = [
            ("registration.basic", self.registration.basic),
            ("registration.smart_card", self.registration.smart_card),
            ("registration.temporary", self.registration.temporary),
            ("hsrp", self.hsrp),
            ("fastag", self.fastag),
            ("handling", self.handling),
            ("hypothecation", self.hypothecation),
            ("third_party.petrol", self.third_party.petrol),
            ("third_party.diesel", self.third_party.diesel),
            ("third_party.ev", self.third_party.ev),
            ("personal_accident_cover", self.personal_accident_cover),
            ("tcs_threshold", self.tcs_threshold),
        ];
        if let Some((name, value)) = fees.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "{name}: fee {value} cannot be negative"
            )));
        }
        if let Some((name, value)) = fees.iter().find(|(_, v)| *v > MAX_AMOUNT) {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "{name}: fee {value} exceeds {MAX_AMOUNT}"
            )));
        }

        if self.tcs_rate < Decimal::ZERO || self.tcs_rate > Decimal::ONE {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "tcs_rate: {} is outside [0, 1]",
                self.tcs_rate
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loan policy
// ---------------------------------------------------------------------------

pub const DEFAULT_DISCLAIMER: &str = "EMI figures are indicative and computed on the \
reducing-balance method. Actual EMI, interest rate and eligibility are subject to the \
lender's approval and may vary.";

/// Bounds the site's finance form enforces, plus the amortization preview length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    /// Upper bound on the annual interest rate, in percent
    pub max_interest_rate: Decimal,
    pub min_tenure_months: u32,
    pub max_tenure_months: u32,
    /// Rows shown in the amortization preview (a product choice, not a limit of the maths)
    pub preview_months: u32,
    pub disclaimer: String,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        LoanPolicy {
            max_interest_rate: dec!(50),
            min_tenure_months: 1,
            max_tenure_months: 84,
            preview_months: 12,
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
        }
    }
}

impl LoanPolicy {
    pub fn validate(&self) -> DealerFinanceResult<()> {
        if self.max_interest_rate < Decimal::ZERO {
            return Err(DealerFinanceError::InvalidSchedule(
                "loan.max_interest_rate cannot be negative".into(),
            ));
        }
        if self.min_tenure_months == 0 {
            return Err(DealerFinanceError::InvalidSchedule(
                "loan.min_tenure_months must be at least 1".into(),
            ));
        }
        if self.min_tenure_months > self.max_tenure_months {
            return Err(DealerFinanceError::InvalidSchedule(format!(
                "loan tenure bounds are inverted: {} > {}",
                self.min_tenure_months, self.max_tenure_months
            )));
        }
        if self.preview_months == 0 {
            return Err(DealerFinanceError::InvalidSchedule(
                "loan.preview_months must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dealer config file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealerConfig {
    pub pricing: PricingSchedule,
    pub loan: LoanPolicy,
}

impl DealerConfig {
    /// Parse and validate a config document. YAML is a superset of JSON, so both are accepted.
    pub fn from_yaml_str(contents: &str) -> DealerFinanceResult<Self> {
        let config: DealerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        tracing::debug!(
            road_tax_brackets = config.pricing.road_tax.brackets().len(),
            max_tenure = config.loan.max_tenure_months,
            "loaded dealer config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> DealerFinanceResult<()> {
        self.pricing.validate()?;
        self.loan.validate()
    }
}
