use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in whole-currency base units (Rupiah).
/// Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Plain percentages: 30 means 30 %. Never fractions.
pub type Percent = Decimal;

/// Unit counts that may become fractional after scaling (e.g. a sales drop).
pub type Units = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Clamp a value at zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Safe percentage: `numerator / denominator * 100`, or zero when the
/// denominator is zero. Out-of-range ratios saturate at `Decimal::MAX` or
/// `Decimal::MIN`.
pub fn safe_percent(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    match numerator.checked_div(denominator) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None if numerator.is_sign_negative() == denominator.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}
