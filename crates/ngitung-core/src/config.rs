use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Margin used when the user has not entered one.
pub const DEFAULT_PROFIT_MARGIN: Percent = dec!(30);

/// Tunables for recommendations and the default what-if magnitudes.
///
/// Every field has a default, so a partial JSON/YAML document only needs to
/// name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Monthly profit the target-sales recommendation aims for
    pub target_monthly_profit: Money,
    /// Margins below this trigger the low-margin warning
    pub low_margin_threshold: Percent,
    /// Multiplier applied to break-even units for the safety target
    pub safety_factor: Decimal,
    /// Default raw-material price increase for reports
    pub material_cost_shock: Percent,
    /// Default sales-volume drop for reports
    pub sales_drop: Percent,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_monthly_profit: dec!(5_000_000),
            low_margin_threshold: dec!(30),
            safety_factor: dec!(1.3),
            material_cost_shock: dec!(20),
            sales_drop: dec!(30),
        }
    }
}
