//! Rule-based pricing guidance.
//!
//! Each rule reads the same result snapshot and either emits one
//! recommendation or nothing. Rules never see each other's output, so their
//! order only affects presentation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::currency::{format_percent, format_rupiah, format_units};
use crate::pricing::engine::{recompute, PricingInput, PricingParameters, PricingResult};
use crate::types::{with_metadata, ComputationOutput, Units};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

impl Severity {
    /// Hex colour hint for card rendering.
    pub fn color_hint(&self) -> &'static str {
        match self {
            Severity::Info => "#34D399",
            Severity::Warning => "#FBBF24",
            Severity::Danger => "#F472B6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    TargetSales,
    LowMargin,
    SafetyMargin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub color_hint: String,
    /// Unit count the rule is about, when it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
}

impl Recommendation {
    fn new(
        kind: RecommendationKind,
        severity: Severity,
        title: String,
        description: String,
        units: Option<Units>,
    ) -> Self {
        Self {
            kind,
            title,
            description,
            severity,
            color_hint: severity.color_hint().to_string(),
            units,
        }
    }
}

/// Snapshot every rule evaluates against.
pub struct RuleContext<'a> {
    pub result: &'a PricingResult,
    pub params: &'a PricingParameters,
    pub config: &'a AnalysisConfig,
}

type Rule = fn(&RuleContext<'_>) -> Option<Recommendation>;

const RULES: &[Rule] = &[target_sales_rule, low_margin_rule, safety_margin_rule];

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Units per month needed to cover fixed costs and still earn `target_profit`.
/// `None` when no volume gets there or the count is out of range.
pub fn required_sales_for_profit(result: &PricingResult, target_profit: Decimal) -> Option<Units> {
    let contribution = result.selling_price.saturating_sub(result.bpp);
    if contribution > Decimal::ZERO {
        result
            .total_fixed_cost
            .saturating_add(target_profit)
            .checked_div(contribution)
            .map(|units| units.ceil())
    } else {
        None
    }
}

fn target_sales_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let target = ctx.config.target_monthly_profit;
    let required = required_sales_for_profit(ctx.result, target);
    let description = match required {
        Some(units) => format!(
            "Sell at least {} per month to earn {} profit.",
            format_units(Some(units)),
            format_rupiah(target)
        ),
        None => format!(
            "No sales volume reaches {} profit at the current price. Raise the selling price above BPP first.",
            format_rupiah(target)
        ),
    };
    Some(Recommendation::new(
        RecommendationKind::TargetSales,
        Severity::Info,
        format!("Target sales for {} profit", format_rupiah(target)),
        description,
        required,
    ))
}

fn low_margin_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let margin = ctx.params.effective_margin();
    let threshold = ctx.config.low_margin_threshold;
    if margin >= threshold {
        return None;
    }
    Some(Recommendation::new(
        RecommendationKind::LowMargin,
        Severity::Warning,
        "Increase your profit margin".to_string(),
        format!(
            "A {} margin is below the recommended {}. Consider raising the price or lowering variable costs.",
            format_percent(margin),
            format_percent(threshold)
        ),
        None,
    ))
}

fn safety_margin_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let (units, description) = match ctx.result.break_even_point_units {
        Some(bep) => {
            let safe = bep.saturating_mul(ctx.config.safety_factor).ceil();
            (
                Some(safe),
                format!(
                    "Aim for at least {} per month ({}x break-even). Selling fewer than {} is a loss.",
                    format_units(Some(safe)),
                    ctx.config.safety_factor.normalize().to_string().replace('.', ","),
                    format_units(Some(bep))
                ),
            )
        }
        None => (
            None,
            "Break-even cannot be reached at the current price. Every sale is a loss until the selling price exceeds BPP.".to_string(),
        ),
    };
    Some(Recommendation::new(
        RecommendationKind::SafetyMargin,
        Severity::Danger,
        "Keep a safety margin above break-even".to_string(),
        description,
        units,
    ))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Evaluate every rule against one result snapshot.
pub fn generate_recommendations(
    result: &PricingResult,
    params: &PricingParameters,
    config: &AnalysisConfig,
) -> Vec<Recommendation> {
    let ctx = RuleContext {
        result,
        params,
        config,
    };
    RULES.iter().filter_map(|rule| rule(&ctx)).collect()
}

pub fn analyze_recommendations(
    input: &PricingInput,
    config: &AnalysisConfig,
) -> ComputationOutput<Vec<Recommendation>> {
    let start = Instant::now();
    let result = recompute(&input.fixed_costs, &input.variable_costs, &input.parameters);
    let recommendations = generate_recommendations(&result, &input.parameters, config);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Rule-based pricing recommendations: target sales, margin level, break-even safety",
        &serde_json::json!({
            "target_monthly_profit": config.target_monthly_profit.to_string(),
            "low_margin_threshold": config.low_margin_threshold.to_string(),
            "safety_factor": config.safety_factor.to_string(),
        }),
        Vec::new(),
        elapsed,
        recommendations,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
