use dealer_finance_core::pricing::{self, InsuranceType, PricingOptions};
use dealer_finance_core::schedule::{PricingSchedule, RateBracket, RateBracketTable};
use dealer_finance_core::{DealerFinanceError, FuelType};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Known-answer scenarios
// ===========================================================================

#[test]
fn test_twelve_lakh_financed_petrol_breakdown() {
    let opts = PricingOptions::new().financed(true).fuel_type(FuelType::Petrol);
    let out = pricing::calculate_on_road_price(dec!(1200000), &opts).unwrap();
    let b = &out.result.breakdown;

    assert_eq!(b.ex_showroom, dec!(1200000));
    assert_eq!(b.road_tax, dec!(204000));
    assert_eq!(b.registration, dec!(950));
    assert_eq!(b.hsrp, dec!(600));
    assert_eq!(b.fastag, dec!(500));
    assert_eq!(b.hypothecation, dec!(1500));
    assert_eq!(b.insurance, dec!(36444));
    assert_eq!(b.handling, dec!(3000));
    assert_eq!(b.tcs, dec!(12000));
    assert_eq!(b.accessories, Decimal::ZERO);

    // 1200000 + 204000 + 950 + 600 + 500 + 1500 + 36444 + 3000 + 12000
    assert_eq!(out.result.total, dec!(1458994));
}

#[test]
fn test_entry_hatchback_cash_purchase() {
    // 4.5 lakh, 13% bracket, 3.2% OD, no TCS, not financed
    let out = pricing::calculate_on_road_price(dec!(450000), &PricingOptions::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.breakdown.road_tax, dec!(58500));
    assert_eq!(r.insurance_detail.own_damage, dec!(14400));
    assert_eq!(r.breakdown.insurance, dec!(17244));
    assert_eq!(r.breakdown.hypothecation, Decimal::ZERO);
    assert_eq!(r.breakdown.tcs, Decimal::ZERO);
    let fees = dec!(950) + dec!(500) + dec!(600) + dec!(3000);
    assert_eq!(r.total, dec!(450000) + dec!(58500) + dec!(17244) + fees);
}

#[test]
fn test_premium_ev_with_accessories() {
    let opts = PricingOptions::new()
        .fuel_type(FuelType::Ev)
        .accessories_total(dec!(45000));
    let out = pricing::calculate_on_road_price(dec!(2500000), &opts).unwrap();
    let r = &out.result;
    assert_eq!(r.road_tax_rate, dec!(0.20));
    assert_eq!(r.breakdown.road_tax, dec!(500000));
    // 62,500 OD + 1,650 EV TP + 750 PA
    assert_eq!(r.breakdown.insurance, dec!(64900));
    assert_eq!(r.breakdown.tcs, dec!(25000));
    assert_eq!(r.breakdown.accessories, dec!(45000));
}

// ===========================================================================
// Boundaries
// ===========================================================================

#[test]
fn test_road_tax_bracket_steps() {
    let opts = PricingOptions::default();
    let cases = [
        (dec!(499999), dec!(0.13)),
        (dec!(500000), dec!(0.14)),
        (dec!(999999), dec!(0.14)),
        (dec!(1000000), dec!(0.17)),
        (dec!(1499999), dec!(0.17)),
        (dec!(1500000), dec!(0.18)),
        (dec!(1999999), dec!(0.18)),
        (dec!(2000000), dec!(0.20)),
    ];
    for (price, rate) in cases {
        let r = pricing::calculate_on_road_price(price, &opts).unwrap().result;
        assert_eq!(r.road_tax_rate, rate, "rate at {price}");
        let ratio = r.breakdown.road_tax / price;
        assert!((ratio - rate).abs() < dec!(0.00001), "road tax ratio at {price}");
    }
}

#[test]
fn test_tcs_threshold_is_strict() {
    let opts = PricingOptions::default();
    let at = pricing::calculate_on_road_price(dec!(1000000), &opts).unwrap();
    let above = pricing::calculate_on_road_price(dec!(1000001), &opts).unwrap();
    assert_eq!(at.result.breakdown.tcs, Decimal::ZERO);
    assert!(above.result.breakdown.tcs > Decimal::ZERO);
}

#[test]
fn test_comprehensive_versus_third_party() {
    let comp = pricing::calculate_on_road_price(dec!(900000), &PricingOptions::default())
        .unwrap()
        .result;
    let tp = pricing::calculate_on_road_price(
        dec!(900000),
        &PricingOptions::new().insurance_type(InsuranceType::ThirdParty),
    )
    .unwrap()
    .result;
    assert_eq!(comp.breakdown.insurance - tp.breakdown.insurance, dec!(28800));
    assert_eq!(comp.total - tp.total, dec!(28800));
}

#[test]
fn test_negative_ex_showroom_is_validation_error() {
    let err = pricing::calculate_on_road_price(dec!(-100), &PricingOptions::default()).unwrap_err();
    match err {
        DealerFinanceError::InvalidInput { field, .. } => assert_eq!(field, "ex_showroom_price"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_regional_schedule_override() {
    let schedule = PricingSchedule {
        road_tax: RateBracketTable::new(vec![
            RateBracket::below(dec!(1000000), dec!(0.10)),
            RateBracket::open(dec!(0.12)),
        ]),
        ..PricingSchedule::default()
    };
    let r = pricing::calculate_on_road_price_with_schedule(
        dec!(1000000),
        &PricingOptions::default(),
        &schedule,
    )
    .unwrap()
    .result;
    assert_eq!(r.breakdown.road_tax, dec!(120000));
}

#[test]
fn test_envelope_metadata() {
    let out = pricing::calculate_on_road_price(dec!(750000), &PricingOptions::default()).unwrap();
    assert!(out.methodology.contains("On-Road"));
    assert_eq!(out.assumptions["road_tax_rate"], "0.14");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

// ===========================================================================
// Properties
// ===========================================================================

fn rupees() -> impl Strategy<Value = Decimal> {
    (0u64..50_000_000u64, 0u32..100u32)
        .prop_map(|(whole, paise)| Decimal::from(whole) + Decimal::new(paise as i64, 2))
}

fn any_options() -> impl Strategy<Value = PricingOptions> {
    (
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(FuelType::Petrol), Just(FuelType::Diesel), Just(FuelType::Ev)],
        any::<bool>(),
        0u64..200_000u64,
        any::<bool>(),
    )
        .prop_map(|(include_insurance, third_party, fuel, financed, acc, tcs)| {
            PricingOptions::new()
                .include_insurance(include_insurance)
                .insurance_type(if third_party {
                    InsuranceType::ThirdParty
                } else {
                    InsuranceType::Comprehensive
                })
                .fuel_type(fuel)
                .financed(financed)
                .accessories_total(Decimal::from(acc))
                .include_tcs(tcs)
        })
}

proptest! {
    #[test]
    fn prop_total_is_sum_of_breakdown(price in rupees(), opts in any_options()) {
        let r = pricing::calculate_on_road_price(price, &opts).unwrap().result;
        let b = &r.breakdown;
        let sum = b.ex_showroom + b.road_tax + b.registration + b.insurance + b.fastag
            + b.hsrp + b.handling + b.hypothecation + b.accessories + b.tcs;
        prop_assert_eq!(r.total, sum);
    }

    #[test]
    fn prop_all_fields_non_negative(price in rupees(), opts in any_options()) {
        let r = pricing::calculate_on_road_price(price, &opts).unwrap().result;
        for (name, amount) in r.breakdown.line_items() {
            prop_assert!(amount >= Decimal::ZERO, "{} was negative", name);
        }
    }

    #[test]
    fn prop_hypothecation_follows_financing(price in rupees(), opts in any_options()) {
        let r = pricing::calculate_on_road_price(price, &opts).unwrap().result;
        let expected = if opts.is_financed { dec!(1500) } else { Decimal::ZERO };
        prop_assert_eq!(r.breakdown.hypothecation, expected);
    }

    #[test]
    fn prop_no_insurance_means_zero_premium(price in rupees(), opts in any_options()) {
        let opts = opts.include_insurance(false);
        let r = pricing::calculate_on_road_price(price, &opts).unwrap().result;
        prop_assert_eq!(r.breakdown.insurance, Decimal::ZERO);
    }
}
