use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::Value;

use ngitung_core::config::AnalysisConfig;
use ngitung_core::parse::{parse_currency, parse_number_or_default};
use ngitung_core::pricing::engine::{analyze_pricing, PricingInput};
use ngitung_core::pricing::recommendations::analyze_recommendations;
use ngitung_core::pricing::simulation::run_simulations;
use ngitung_core::report::generate_report;

use super::ParameterFlags;
use crate::input;

/// Arguments for a one-off pricing calculation
#[derive(Args)]
pub struct PriceArgs {
    /// Path to JSON input file with costs and parameters (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub params: ParameterFlags,
}

/// Arguments for the what-if scenarios
#[derive(Args)]
pub struct SimulateArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub params: ParameterFlags,

    /// Material (variable) cost change in percent; negative for a decrease
    #[arg(long, allow_hyphen_values = true)]
    pub material_shock: Option<String>,

    /// Sales volume drop in percent; negative for growth
    #[arg(long, allow_hyphen_values = true)]
    pub sales_drop: Option<String>,
}

/// Arguments for rule-based recommendations
#[derive(Args)]
pub struct RecommendArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub params: ParameterFlags,

    /// Monthly profit goal in rupiah (e.g. "Rp 5.000.000")
    #[arg(long)]
    pub target_profit: Option<String>,
}

/// Arguments for the full pricing report
#[derive(Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub params: ParameterFlags,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the plain-text report instead of structured output
    #[arg(long)]
    pub plain: bool,
}

fn load_input(
    path: Option<&str>,
    flags: &ParameterFlags,
    what: &str,
) -> Result<PricingInput, Box<dyn std::error::Error>> {
    let mut input: PricingInput = input::read_document(path, what)?;
    flags.apply(&mut input.parameters);
    Ok(input)
}

pub fn run_price(
    args: PriceArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), &args.params, "pricing")?;
    let output = analyze_pricing(&input, config);
    Ok(serde_json::to_value(output)?)
}

pub fn run_simulate(
    args: SimulateArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), &args.params, "simulation")?;
    let config = shock_config(config, &args);
    let output = run_simulations(&input, &config);
    Ok(serde_json::to_value(output)?)
}

/// Scenario magnitudes from the flags, falling back to the configured ones.
fn shock_config(config: &AnalysisConfig, args: &SimulateArgs) -> AnalysisConfig {
    let mut config = config.clone();
    if let Some(ref s) = args.material_shock {
        config.material_cost_shock = parse_number_or_default(s, config.material_cost_shock);
    }
    if let Some(ref s) = args.sales_drop {
        config.sales_drop = parse_number_or_default(s, config.sales_drop);
    }
    config
}

pub fn run_recommend(
    args: RecommendArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), &args.params, "recommendations")?;
    let mut config = config.clone();
    if let Some(ref s) = args.target_profit {
        config.target_monthly_profit = parse_currency(s);
    }
    let output = analyze_recommendations(&input, &config);
    Ok(serde_json::to_value(output)?)
}

pub fn run_report(
    args: ReportArgs,
    config: &AnalysisConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args.input.as_deref(), &args.params, "report")?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let output = generate_report(&input, config, date);
    if args.plain {
        print!("{}", output.result);
        return Ok(Value::Null);
    }
    Ok(serde_json::to_value(output)?)
}
