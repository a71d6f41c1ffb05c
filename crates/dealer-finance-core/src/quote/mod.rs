pub mod catalog;
pub mod emi_quote;
pub mod on_road_quote;

pub use catalog::{InMemoryCatalog, PriceCatalog};
pub use emi_quote::{emi_quote, EmiQuoteRequest, EmiQuoteResponse, ValidationErrorBody};
pub use on_road_quote::{
    build_finance_quote, build_on_road_quote, FinanceQuote, FinanceQuoteRequest, OnRoadQuote,
    OnRoadQuoteRequest,
};
