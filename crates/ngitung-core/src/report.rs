//! Exportable pricing report: a single snapshot of a note's pricing, cost
//! structure, what-if scenarios and recommendations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::currency::{format_optional_rupiah, format_percent, format_rupiah, format_units};
use crate::pricing::engine::{pricing_warnings, recompute, PricingInput, PricingResult};
use crate::pricing::recommendations::{generate_recommendations, Recommendation};
use crate::pricing::simulation::{
    simulate_material_cost_shock, simulate_sales_volume_shock, MaterialCostShock,
    SalesVolumeShock,
};
use crate::types::{safe_percent, with_metadata, ComputationOutput, Money, Percent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComposition {
    /// Fixed costs plus variable cost of the estimated sales
    pub total_cost: Money,
    pub fixed_cost: Money,
    pub variable_cost: Money,
    pub fixed_cost_percent: Percent,
    pub variable_cost_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub business_name: String,
    pub generated_on: NaiveDate,
    pub pricing: PricingResult,
    pub profit_margin: Percent,
    pub estimated_sales: u64,
    pub cost_composition: CostComposition,
    pub material_cost_shock: MaterialCostShock,
    pub sales_volume_shock: SalesVolumeShock,
    pub recommendations: Vec<Recommendation>,
}

/// Split of the period's total cost into fixed and variable shares.
pub fn cost_composition(result: &PricingResult, estimated_sales: u64) -> CostComposition {
    let fixed_cost = result.total_fixed_cost;
    let variable_cost = result
        .unit_variable_cost
        .saturating_mul(Decimal::from(estimated_sales));
    let total_cost = fixed_cost.saturating_add(variable_cost);
    CostComposition {
        total_cost,
        fixed_cost,
        variable_cost,
        fixed_cost_percent: safe_percent(fixed_cost, total_cost),
        variable_cost_percent: safe_percent(variable_cost, total_cost),
    }
}

pub fn build_report(
    input: &PricingInput,
    config: &AnalysisConfig,
    generated_on: NaiveDate,
) -> PricingReport {
    let params = &input.parameters;
    let pricing = recompute(&input.fixed_costs, &input.variable_costs, params);
    PricingReport {
        business_name: input
            .business_name
            .clone()
            .unwrap_or_else(|| "Untitled".to_string()),
        generated_on,
        profit_margin: params.effective_margin(),
        estimated_sales: params.estimated_sales,
        cost_composition: cost_composition(&pricing, params.estimated_sales),
        material_cost_shock: simulate_material_cost_shock(
            &pricing,
            params,
            config.material_cost_shock,
        ),
        sales_volume_shock: simulate_sales_volume_shock(&pricing, params, config.sales_drop),
        recommendations: generate_recommendations(&pricing, params, config),
        pricing,
    }
}

/// Report envelope for the CLI and bindings.
pub fn generate_report(
    input: &PricingInput,
    config: &AnalysisConfig,
    generated_on: NaiveDate,
) -> ComputationOutput<PricingReport> {
    let start = Instant::now();
    let report = build_report(input, config, generated_on);
    let warnings =
        pricing_warnings(&report.pricing, &input.parameters, config.low_margin_threshold);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Pricing report: cost-plus price, break-even, cost composition, what-if and recommendations",
        &serde_json::json!({
            "business": report.business_name,
            "generated_on": generated_on.to_string(),
            "material_cost_shock": config.material_cost_shock.to_string(),
            "sales_drop": config.sales_drop.to_string(),
        }),
        warnings,
        elapsed,
        report,
    )
}

impl fmt::Display for PricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.pricing;
        writeln!(f, "PRICING REPORT: {}", self.business_name)?;
        writeln!(f, "Date: {}", self.generated_on.format("%d %B %Y"))?;
        writeln!(f)?;
        writeln!(f, "Selling price        {}", format_optional_rupiah(Some(p.selling_price)))?;
        writeln!(
            f,
            "After discount       {}",
            format_optional_rupiah(Some(p.selling_price_after_discount))
        )?;
        writeln!(
            f,
            "After tax            {}",
            format_optional_rupiah(Some(p.selling_price_after_tax))
        )?;
        writeln!(f, "Profit margin        {}", format_percent(self.profit_margin))?;
        writeln!(f, "BPP                  {}", format_optional_rupiah(Some(p.bpp)))?;
        writeln!(f, "Break-even point     {}", format_units(p.break_even_point_units))?;
        writeln!(
            f,
            "Estimated sales      {}",
            format_units(Some(Decimal::from(self.estimated_sales)))
        )?;
        writeln!(f)?;

        let c = &self.cost_composition;
        writeln!(f, "Cost composition")?;
        writeln!(
            f,
            "  Fixed costs        {} ({})",
            format_rupiah(c.fixed_cost),
            format_percent(c.fixed_cost_percent)
        )?;
        writeln!(
            f,
            "  Variable costs     {} ({})",
            format_rupiah(c.variable_cost),
            format_percent(c.variable_cost_percent)
        )?;
        writeln!(f)?;

        let m = &self.material_cost_shock;
        writeln!(f, "Simulation")?;
        writeln!(
            f,
            "  Raw material +{}: price {} (up {}, {})",
            format_percent(m.shock_percent),
            format_rupiah(m.new_selling_price),
            format_rupiah(m.price_increase),
            format_percent(m.price_increase_percent)
        )?;
        let s = &self.sales_volume_shock;
        writeln!(
            f,
            "  Sales -{}: profit {} ({})",
            format_percent(s.drop_percent),
            format_rupiah(s.profit),
            if s.still_profitable {
                "still profitable"
            } else {
                "loss"
            }
        )?;
        writeln!(f)?;

        writeln!(f, "Recommendations")?;
        for (i, r) in self.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, r.title)?;
            writeln!(f, "     {}", r.description)?;
        }
        Ok(())
    }
}
