use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use ngitung_core::config::AnalysisConfig;
use ngitung_core::note::Note;
use ngitung_core::PricingInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<PricingInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

/// Missing config means the default thresholds.
fn parse_config(config_json: Option<String>) -> NapiResult<AnalysisConfig> {
    match config_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(AnalysisConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_pricing(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let config = parse_config(config_json)?;
    let output = ngitung_core::pricing::engine::analyze_pricing(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let config = parse_config(config_json)?;
    let output = ngitung_core::pricing::simulation::run_simulations(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn recommendations(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let config = parse_config(config_json)?;
    let output = ngitung_core::pricing::recommendations::analyze_recommendations(&input, &config);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `date` is `YYYY-MM-DD`; today when omitted.
#[napi]
pub fn build_report(
    input_json: String,
    config_json: Option<String>,
    date: Option<String>,
) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let config = parse_config(config_json)?;
    let generated_on = match date {
        Some(d) => NaiveDate::from_str(d.trim()).map_err(to_napi_error)?,
        None => Local::now().date_naive(),
    };
    let output = ngitung_core::report::generate_report(&input, &config, generated_on);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Plain-text rendering of the same report, for sharing.
#[napi]
pub fn report_text(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let config = parse_config(config_json)?;
    let report = ngitung_core::report::build_report(&input, &config, Local::now().date_naive());
    Ok(report.to_string())
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Recompute a note the host persists itself and return it with fresh
/// card prices and result.
#[napi]
pub fn recompute_note(note_json: String) -> NapiResult<String> {
    let mut note: Note = serde_json::from_str(&note_json).map_err(to_napi_error)?;
    note.apply_result();
    serde_json::to_string(&note).map_err(to_napi_error)
}

#[napi]
pub fn new_note(name: String) -> NapiResult<String> {
    let note = Note::new(&name).map_err(to_napi_error)?;
    serde_json::to_string(&note).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Decimal string in, `Rp 12.345` out.
#[napi]
pub fn format_rupiah(value: String) -> NapiResult<String> {
    let value = Decimal::from_str(value.trim()).map_err(to_napi_error)?;
    Ok(ngitung_core::currency::format_rupiah(value))
}

/// Indonesian-formatted amount in, decimal string out.
#[napi]
pub fn parse_currency(text: String) -> String {
    ngitung_core::parse::parse_currency(&text).to_string()
}

#[napi]
pub fn format_currency_input(text: String) -> String {
    ngitung_core::currency::format_currency_input(&text)
}
