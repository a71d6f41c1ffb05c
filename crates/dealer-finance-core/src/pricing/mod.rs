pub mod on_road;
pub mod options;

pub use on_road::{
    calculate_on_road_price, calculate_on_road_price_with_schedule, InsuranceDetail,
    PriceBreakdown, PricingResult,
};
pub use options::{InsuranceType, OnRoadRequest, PricingOptions};
