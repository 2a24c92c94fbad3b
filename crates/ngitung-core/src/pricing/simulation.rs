//! What-if scenarios over an already-computed [`PricingResult`].
//!
//! Both scenarios are pure transforms: the stored result and parameters are
//! only read, and a 0 % shock reproduces the baseline exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::pricing::engine::{apply_margin, recompute, PricingInput, PricingParameters, PricingResult};
use crate::types::{non_negative, safe_percent, with_metadata, ComputationOutput, Money, Percent, Units};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of a raw-material price change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCostShock {
    /// Applied change to the variable cost, in percent
    pub shock_percent: Percent,
    pub new_unit_variable_cost: Money,
    pub new_bpp: Money,
    /// Price that keeps the same margin over the new BPP
    pub new_selling_price: Money,
    /// new_selling_price - current selling price
    pub price_increase: Money,
    /// price_increase relative to the current selling price
    pub price_increase_percent: Percent,
    /// Markup actually earned if the current price is kept
    pub margin_if_price_unchanged: Percent,
    /// Margin points lost by keeping the current price
    pub margin_impact: Percent,
}

/// Outcome of a drop in units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesVolumeShock {
    /// Applied drop in sales, in percent
    pub drop_percent: Percent,
    pub new_sales: Units,
    pub revenue: Money,
    /// Fixed costs plus variable cost of the units sold
    pub total_cost: Money,
    pub profit: Money,
    /// Profit at the original sales estimate
    pub baseline_profit: Money,
    pub profit_change: Money,
    pub still_profitable: bool,
}

/// Both scenarios together, for the CLI and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub baseline: PricingResult,
    pub material_cost_shock: MaterialCostShock,
    pub sales_volume_shock: SalesVolumeShock,
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// `value` changed by `percent`, floored at zero and saturating at
/// `Decimal::MAX`.
fn scale(value: Decimal, percent: Percent) -> Decimal {
    non_negative(value.saturating_mul(Decimal::ONE.saturating_add(percent / Decimal::ONE_HUNDRED)))
}

fn revenue_and_cost(result: &PricingResult, units: Units) -> (Money, Money) {
    let revenue = result.selling_price.saturating_mul(units);
    let total_cost = result
        .total_fixed_cost
        .saturating_add(result.unit_variable_cost.saturating_mul(units));
    (revenue, total_cost)
}

/// Period profit when `units` are sold at the result's selling price.
pub fn profit_at_volume(result: &PricingResult, units: Units) -> Money {
    let (revenue, total_cost) = revenue_and_cost(result, units);
    revenue.saturating_sub(total_cost)
}

/// Scale the variable cost by `percent` and re-derive BPP and price at the
/// same margin. Fixed cost allocation per unit is unchanged. A negative
/// `percent` models a cheaper input; the variable cost never drops below zero.
pub fn simulate_material_cost_shock(
    result: &PricingResult,
    params: &PricingParameters,
    percent: Percent,
) -> MaterialCostShock {
    let margin = params.effective_margin();
    let new_unit_variable_cost = scale(result.unit_variable_cost, percent);
    let new_bpp = new_unit_variable_cost.saturating_add(result.fixed_cost_per_unit);
    let new_selling_price = apply_margin(new_bpp, margin);
    let price_increase = new_selling_price.saturating_sub(result.selling_price);
    let (margin_if_price_unchanged, margin_impact) = if new_bpp.is_zero() {
        (margin, Decimal::ZERO)
    } else {
        let earned = safe_percent(result.selling_price.saturating_sub(new_bpp), new_bpp);
        (earned, margin.saturating_sub(earned))
    };

    debug!(%percent, %new_bpp, %new_selling_price, "material cost shock simulated");

    MaterialCostShock {
        shock_percent: percent,
        new_unit_variable_cost,
        new_bpp,
        new_selling_price,
        price_increase,
        price_increase_percent: safe_percent(price_increase, result.selling_price),
        margin_if_price_unchanged,
        margin_impact,
    }
}

/// Reduce the sales estimate by `percent` and re-derive revenue, cost and
/// profit at the current selling price.
pub fn simulate_sales_volume_shock(
    result: &PricingResult,
    params: &PricingParameters,
    percent: Percent,
) -> SalesVolumeShock {
    let sales = Decimal::from(params.estimated_sales);
    // drops beyond 100 % bottom out at zero units; a negative drop is growth
    let new_sales = scale(sales, -percent);
    let (revenue, total_cost) = revenue_and_cost(result, new_sales);
    let profit = revenue.saturating_sub(total_cost);
    let baseline_profit = profit_at_volume(result, sales);

    debug!(%percent, %new_sales, %profit, "sales volume shock simulated");

    SalesVolumeShock {
        drop_percent: percent,
        new_sales,
        revenue,
        total_cost,
        profit,
        baseline_profit,
        profit_change: profit.saturating_sub(baseline_profit),
        still_profitable: profit > Decimal::ZERO,
    }
}

/// Run both scenarios with the configured magnitudes.
pub fn run_simulations(
    input: &PricingInput,
    config: &AnalysisConfig,
) -> ComputationOutput<SimulationOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let baseline = recompute(&input.fixed_costs, &input.variable_costs, &input.parameters);
    let material_cost_shock =
        simulate_material_cost_shock(&baseline, &input.parameters, config.material_cost_shock);
    let sales_volume_shock =
        simulate_sales_volume_shock(&baseline, &input.parameters, config.sales_drop);

    if input.parameters.estimated_sales == 0 {
        warnings.push("Estimated sales is zero; sales-drop scenario has no volume".to_string());
    }
    if !sales_volume_shock.still_profitable {
        warnings.push(format!(
            "Business is not profitable after a {}% sales drop",
            config.sales_drop
        ));
    }

    let output = SimulationOutput {
        baseline,
        material_cost_shock,
        sales_volume_shock,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "What-if analysis: raw-material cost shock and sales-volume shock",
        &serde_json::json!({
            "material_cost_shock": config.material_cost_shock.to_string(),
            "sales_drop": config.sales_drop.to_string(),
            "estimated_sales": input.parameters.estimated_sales,
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostSummary;
    use crate::pricing::engine::compute_pricing;
    use rust_decimal_macros::dec;

    fn bakery() -> (PricingResult, PricingParameters) {
        let params = PricingParameters {
            profit_margin: Some(dec!(30)),
            estimated_sales: 100,
            ..Default::default()
        };
        let costs = CostSummary {
            total_fixed_cost: dec!(1_000_000),
            unit_variable_cost: dec!(2_000),
        };
        (compute_pricing(&costs, &params), params)
    }

    #[test]
    fn test_material_shock_twenty_percent() {
        let (result, params) = bakery();
        let shock = simulate_material_cost_shock(&result, &params, dec!(20));
        // VC 2000 -> 2400, BPP 12400, price 16120
        assert_eq!(shock.new_unit_variable_cost, dec!(2_400));
        assert_eq!(shock.new_bpp, dec!(12_400));
        assert_eq!(shock.new_selling_price, dec!(16_120));
        assert_eq!(shock.price_increase, dec!(520));
        // 520 / 15600 = 3.333..%
        assert!(shock.price_increase_percent > dec!(3.33));
        assert!(shock.price_increase_percent < dec!(3.34));
        assert!(shock.margin_impact > Decimal::ZERO);
    }

    #[test]
    fn test_material_shock_zero_is_identity() {
        let (result, params) = bakery();
        let shock = simulate_material_cost_shock(&result, &params, Decimal::ZERO);
        assert_eq!(shock.new_bpp, result.bpp);
        assert_eq!(shock.new_selling_price, result.selling_price);
        assert_eq!(shock.price_increase, Decimal::ZERO);
        assert_eq!(shock.margin_if_price_unchanged, dec!(30));
        assert_eq!(shock.margin_impact, Decimal::ZERO);
    }

    #[test]
    fn test_sales_shock_thirty_percent() {
        let (result, params) = bakery();
        let shock = simulate_sales_volume_shock(&result, &params, dec!(30));
        // 70 units: revenue 1,092,000; cost 1,000,000 + 140,000 = 1,140,000
        assert_eq!(shock.new_sales, dec!(70));
        assert_eq!(shock.revenue, dec!(1_092_000));
        assert_eq!(shock.total_cost, dec!(1_140_000));
        assert_eq!(shock.profit, dec!(-48_000));
        assert!(!shock.still_profitable);
        // baseline: 1,560,000 - 1,200,000 = 360,000
        assert_eq!(shock.baseline_profit, dec!(360_000));
    }

    #[test]
    fn test_sales_shock_zero_is_identity() {
        let (result, params) = bakery();
        let shock = simulate_sales_volume_shock(&result, &params, Decimal::ZERO);
        assert_eq!(shock.profit, shock.baseline_profit);
        assert_eq!(shock.profit_change, Decimal::ZERO);
        assert!(shock.still_profitable);
    }

    #[test]
    fn test_material_shock_with_zero_costs() {
        let params = PricingParameters::default();
        let result = compute_pricing(
            &CostSummary {
                total_fixed_cost: Decimal::ZERO,
                unit_variable_cost: Decimal::ZERO,
            },
            &params,
        );
        let shock = simulate_material_cost_shock(&result, &params, dec!(20));
        assert_eq!(shock.new_bpp, Decimal::ZERO);
        assert_eq!(shock.price_increase_percent, Decimal::ZERO);
        assert_eq!(shock.margin_impact, Decimal::ZERO);
    }

    #[test]
    fn test_material_cost_decrease() {
        let (result, params) = bakery();
        let cheaper = simulate_material_cost_shock(&result, &params, dec!(-50));
        assert_eq!(cheaper.new_unit_variable_cost, dec!(1_000));
        assert_eq!(cheaper.new_bpp, dec!(11_000));
        assert!(cheaper.price_increase < Decimal::ZERO);

        let beyond = simulate_material_cost_shock(&result, &params, dec!(-150));
        assert_eq!(beyond.new_unit_variable_cost, Decimal::ZERO);
        assert_eq!(beyond.new_bpp, result.fixed_cost_per_unit);
    }

    #[test]
    fn test_sales_drop_beyond_hundred_is_zero_units() {
        let (result, params) = bakery();
        let shock = simulate_sales_volume_shock(&result, &params, dec!(150));
        assert_eq!(shock.new_sales, Decimal::ZERO);
        assert_eq!(shock.revenue, Decimal::ZERO);
        assert_eq!(shock.profit, dec!(-1_000_000));
    }

    #[test]
    fn test_huge_sales_estimate_saturates() {
        let params = PricingParameters {
            profit_margin: Some(dec!(30)),
            estimated_sales: 18_000_000_000_000_000_000,
            ..Default::default()
        };
        let costs = CostSummary {
            total_fixed_cost: Decimal::ZERO,
            unit_variable_cost: dec!(10_000_000_000),
        };
        let result = compute_pricing(&costs, &params);
        let shock = simulate_sales_volume_shock(&result, &params, dec!(30));
        assert_eq!(shock.total_cost, Decimal::MAX);
        assert_eq!(shock.revenue, Decimal::MAX);
        assert_eq!(shock.baseline_profit, Decimal::ZERO);

        let material = simulate_material_cost_shock(&result, &params, dec!(20));
        assert_eq!(material.new_unit_variable_cost, dec!(12_000_000_000));
    }

    #[test]
    fn test_run_simulations_uses_config_magnitudes() {
        let input = PricingInput {
            business_name: None,
            fixed_costs: vec![crate::cost::FixedCost::new("Rent", dec!(1_000_000))],
            variable_costs: vec![crate::cost::VariableCost::new("Flour", dec!(2_000), dec!(1))],
            parameters: PricingParameters {
                profit_margin: Some(dec!(30)),
                estimated_sales: 100,
                ..Default::default()
            },
        };
        let out = run_simulations(&input, &AnalysisConfig::default());
        assert_eq!(out.result.material_cost_shock.shock_percent, dec!(20));
        assert_eq!(out.result.sales_volume_shock.drop_percent, dec!(30));
        assert!(out.warnings.iter().any(|w| w.contains("not profitable")));
    }
}
