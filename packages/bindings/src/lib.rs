use napi::Result as NapiResult;
use napi_derive::napi;

use ipo_deal_core::deal::{self, DealTerms, IpoOutcomeInput};
use ipo_deal_core::presentation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

#[napi]
pub fn default_deal_terms() -> NapiResult<String> {
    serde_json::to_string(&DealTerms::default()).map_err(to_napi_error)
}

#[napi]
pub fn ipo_outcome(input_json: String) -> NapiResult<String> {
    let input: IpoOutcomeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::evaluate_ipo_outcome(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[napi]
pub fn ipo_waterfall(input_json: String) -> NapiResult<String> {
    let input: IpoOutcomeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::evaluate_ipo_outcome(&input).map_err(to_napi_error)?;
    let bars = presentation::waterfall_bars(&output.result);
    serde_json::to_string(&bars).map_err(to_napi_error)
}

#[napi]
pub fn ipo_dashboard(input_json: String) -> NapiResult<String> {
    let input: IpoOutcomeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::evaluate_ipo_outcome(&input).map_err(to_napi_error)?;
    let dashboard =
        presentation::render_dashboard(&output, &input.terms).map_err(to_napi_error)?;
    serde_json::to_string(&dashboard).map_err(to_napi_error)
}

#[napi]
pub fn price_control() -> NapiResult<String> {
    serde_json::to_string(&presentation::PriceControl::default()).map_err(to_napi_error)
}
