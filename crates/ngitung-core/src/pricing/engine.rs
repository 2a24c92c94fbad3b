use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, DEFAULT_PROFIT_MARGIN};
use crate::cost::{aggregate_costs, CostSummary, FixedCost, VariableCost};
use crate::parse::{lenient_optional_decimal, lenient_percent, lenient_units};
use crate::types::{non_negative, with_metadata, ComputationOutput, Money, Percent, Units};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Business parameters entered alongside the cost items. Serialized with
/// the camelCase keys and plain numbers the stored note uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingParameters {
    /// Markup over BPP in percent. `None` means the 30 % default applies.
    #[serde(
        default,
        alias = "profit_margin",
        deserialize_with = "lenient_optional_decimal",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub profit_margin: Option<Percent>,
    /// Units expected to sell per month
    #[serde(default, alias = "estimated_sales", deserialize_with = "lenient_units")]
    pub estimated_sales: u64,
    /// Discount off the selling price, in percent
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub discount: Percent,
    /// Income tax (PPh) added on top of the discounted price, in percent
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub pph: Percent,
    /// Value-added tax (PPN) added on top of the discounted price, in percent
    #[serde(
        default,
        deserialize_with = "lenient_percent",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub ppn: Percent,
}

impl PricingParameters {
    /// Margin actually used by the engine.
    pub fn effective_margin(&self) -> Percent {
        self.profit_margin.unwrap_or(DEFAULT_PROFIT_MARGIN)
    }
}

/// Everything the engine derives from one set of costs and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub total_fixed_cost: Money,
    pub unit_variable_cost: Money,
    /// total_fixed_cost / estimated_sales, zero when no sales are estimated
    pub fixed_cost_per_unit: Money,
    /// Production cost per unit (Biaya Pokok Produksi)
    pub bpp: Money,
    /// bpp * (1 + margin / 100)
    pub selling_price: Money,
    pub selling_price_after_discount: Money,
    /// Discounted price with PPh and PPN added
    pub selling_price_after_tax: Money,
    /// ceil(FC / (price - bpp)); `None` when the price does not exceed bpp
    pub break_even_point_units: Option<Units>,
}

/// Self-contained pricing request, as read from a JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    #[serde(default, alias = "business_name", skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, alias = "fixed_costs")]
    pub fixed_costs: Vec<FixedCost>,
    #[serde(default, alias = "variable_costs")]
    pub variable_costs: Vec<VariableCost>,
    #[serde(flatten)]
    pub parameters: PricingParameters,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

fn percent_factor(percent: Percent) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Fixed cost carried by each unit. With no sales estimate the fixed costs
/// are not yet amortized and the allocation is zero.
pub fn fixed_cost_per_unit(total_fixed_cost: Money, estimated_sales: u64) -> Money {
    if estimated_sales == 0 {
        Decimal::ZERO
    } else {
        total_fixed_cost / Decimal::from(estimated_sales)
    }
}

/// Markup `bpp` by `margin` percent. Saturates at `Decimal::MAX`.
pub fn apply_margin(bpp: Money, margin: Percent) -> Money {
    non_negative(bpp.saturating_mul(Decimal::ONE.saturating_add(percent_factor(margin))))
}

/// Units needed to recover `total_fixed_cost` at the given unit price and
/// cost. Undefined when each sale does not contribute a positive amount, or
/// when the count is too large to represent.
pub fn break_even_units(total_fixed_cost: Money, selling_price: Money, bpp: Money) -> Option<Units> {
    let contribution = selling_price.saturating_sub(bpp);
    if contribution > Decimal::ZERO {
        total_fixed_cost.checked_div(contribution).map(|units| units.ceil())
    } else {
        None
    }
}

/// Run the pricing chain over already-aggregated costs. Each stage feeds the
/// next: allocation, BPP, margin, discount, taxes, break-even.
pub fn compute_pricing(costs: &CostSummary, params: &PricingParameters) -> PricingResult {
    let fixed_per_unit = fixed_cost_per_unit(costs.total_fixed_cost, params.estimated_sales);
    let bpp = costs.unit_variable_cost.saturating_add(fixed_per_unit);
    let selling_price = apply_margin(bpp, params.effective_margin());
    let selling_price_after_discount = non_negative(
        selling_price.saturating_mul(Decimal::ONE.saturating_sub(percent_factor(params.discount))),
    );
    let tax_factor = Decimal::ONE
        .saturating_add(percent_factor(params.pph))
        .saturating_add(percent_factor(params.ppn));
    let selling_price_after_tax =
        non_negative(selling_price_after_discount.saturating_mul(tax_factor));
    let break_even_point_units = break_even_units(costs.total_fixed_cost, selling_price, bpp);

    debug!(
        total_fixed_cost = %costs.total_fixed_cost,
        unit_variable_cost = %costs.unit_variable_cost,
        estimated_sales = params.estimated_sales,
        %bpp,
        %selling_price,
        "pricing computed"
    );
    if params.estimated_sales == 0 {
        warn!(
            total_fixed_cost = %costs.total_fixed_cost,
            "estimated sales is zero: fixed costs not allocated to bpp"
        );
    }
    if break_even_point_units.is_none() {
        if selling_price > bpp {
            warn!(%selling_price, %bpp, "break-even undefined: unit count out of range");
        } else {
            warn!(%selling_price, %bpp, "break-even undefined: selling price does not exceed bpp");
        }
    }

    PricingResult {
        total_fixed_cost: costs.total_fixed_cost,
        unit_variable_cost: costs.unit_variable_cost,
        fixed_cost_per_unit: fixed_per_unit,
        bpp,
        selling_price,
        selling_price_after_discount,
        selling_price_after_tax,
        break_even_point_units,
    }
}

/// Full recomputation from raw cost items. Pure: the same items and
/// parameters always give an identical result.
pub fn recompute(
    fixed: &[FixedCost],
    variable: &[VariableCost],
    params: &PricingParameters,
) -> PricingResult {
    compute_pricing(&aggregate_costs(fixed, variable), params)
}

/// Human-readable notes on degenerate states in a result. Margins under
/// `low_margin_threshold` percent are flagged too.
pub fn pricing_warnings(
    result: &PricingResult,
    params: &PricingParameters,
    low_margin_threshold: Percent,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if params.estimated_sales == 0 && result.total_fixed_cost > Decimal::ZERO {
        warnings.push(
            "Estimated sales is zero; fixed costs are not allocated to BPP".to_string(),
        );
    }
    if params.profit_margin.is_none() {
        warnings.push(format!(
            "No profit margin entered; default {}% applied",
            DEFAULT_PROFIT_MARGIN
        ));
    }
    let margin = params.effective_margin();
    if margin < low_margin_threshold {
        warnings.push(format!(
            "Profit margin {}% is below the {}% threshold",
            margin.normalize(),
            low_margin_threshold.normalize()
        ));
    }
    if result.break_even_point_units.is_none() {
        if result.selling_price > result.bpp {
            warnings.push(
                "Break-even unit count is too large to represent".to_string(),
            );
        } else {
            warnings.push(
                "Selling price does not exceed BPP; break-even point is unreachable".to_string(),
            );
        }
    }
    if params.discount > Decimal::ONE_HUNDRED {
        warnings.push("Discount above 100%; discounted price clamped to zero".to_string());
    }
    warnings
}

/// Envelope-wrapped pricing for the CLI and bindings.
pub fn analyze_pricing(
    input: &PricingInput,
    config: &AnalysisConfig,
) -> ComputationOutput<PricingResult> {
    let start = Instant::now();
    let result = recompute(&input.fixed_costs, &input.variable_costs, &input.parameters);
    let warnings = pricing_warnings(&result, &input.parameters, config.low_margin_threshold);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Cost-plus pricing: BPP = variable cost + fixed cost / sales; price = BPP * (1 + margin)",
        &serde_json::json!({
            "business": input.business_name,
            "fixed_cost_items": input.fixed_costs.len(),
            "variable_cost_items": input.variable_costs.len(),
            "estimated_sales": input.parameters.estimated_sales,
            "profit_margin": input.parameters.effective_margin().to_string(),
            "discount": input.parameters.discount.to_string(),
            "pph": input.parameters.pph.to_string(),
            "ppn": input.parameters.ppn.to_string(),
            "low_margin_threshold": config.low_margin_threshold.to_string(),
        }),
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
