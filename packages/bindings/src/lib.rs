use napi::Result as NapiResult;
use napi_derive::napi;

use dealer_finance_core::emi::EmiInput;
use dealer_finance_core::pricing::OnRoadRequest;
use dealer_finance_core::quote::{
    EmiQuoteRequest, FinanceQuoteRequest, InMemoryCatalog, OnRoadQuoteRequest,
    ValidationErrorBody,
};
use dealer_finance_core::schedule::DealerConfig;
use dealer_finance_core::DealerFinanceError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Input errors carry the form's validation body as the reason, so the site
/// can `JSON.parse(err.message)` and answer with a 400.
fn core_error(e: DealerFinanceError) -> napi::Error {
    match ValidationErrorBody::from_error(&e) {
        Some(body) => match serde_json::to_string(&body) {
            Ok(json) => napi::Error::new(napi::Status::InvalidArg, json),
            Err(ser) => to_napi_error(ser),
        },
        None => to_napi_error(e),
    }
}

fn dealer_config(config_json: Option<String>) -> NapiResult<DealerConfig> {
    match config_json {
        Some(json) => DealerConfig::from_yaml_str(&json).map_err(core_error),
        None => Ok(DealerConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_on_road_price(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let input: OnRoadRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = dealer_config(config_json)?;
    let output = dealer_finance_core::pricing::calculate_on_road_price_with_schedule(
        input.ex_showroom_price,
        &input.options,
        &config.pricing,
    )
    .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: EmiInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = dealer_config(config_json)?;
    let output = dealer_finance_core::emi::calculate_emi_with_policy(&input, &config.loan)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// EMI calculator form handler: request body in, response body out.
#[napi]
pub fn emi_quote(request_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: EmiQuoteRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let config = dealer_config(config_json)?;
    let response = dealer_finance_core::quote::emi_quote(&request, &config.loan)
        .map_err(core_error)?;
    serde_json::to_string(&response).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog quotes
// ---------------------------------------------------------------------------

#[napi]
pub fn on_road_quote(
    catalog_json: String,
    request_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let catalog = InMemoryCatalog::from_yaml_str(&catalog_json).map_err(core_error)?;
    let request: OnRoadQuoteRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let config = dealer_config(config_json)?;
    let output = dealer_finance_core::quote::build_on_road_quote(&request, &catalog, &config)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn finance_quote(
    catalog_json: String,
    request_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let catalog = InMemoryCatalog::from_yaml_str(&catalog_json).map_err(core_error)?;
    let request: FinanceQuoteRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let config = dealer_config(config_json)?;
    let output = dealer_finance_core::quote::build_finance_quote(&request, &catalog, &config)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
