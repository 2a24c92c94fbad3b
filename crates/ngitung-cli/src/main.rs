mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::note::NoteCommand;
use commands::pricing::{PriceArgs, RecommendArgs, ReportArgs, SimulateArgs};
use ngitung_core::AnalysisConfig;

/// Pricing calculator for small businesses
#[derive(Parser)]
#[command(
    name = "ngitung",
    version,
    about = "Pricing calculator for small businesses",
    long_about = "Work out the cost per unit (BPP), a cost-plus selling price, the price \
                  after discount and taxes, and the break-even volume. Run what-if \
                  scenarios, get recommendations, and keep priced products as notes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file with analysis thresholds and scenario magnitudes
    #[arg(long, global = true, env = "NGITUNG_CONFIG")]
    config: Option<String>,

    /// Notes file
    #[arg(
        long,
        global = true,
        env = "NGITUNG_STORE",
        default_value = "ngitung_notes.json"
    )]
    store: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BPP, selling price, taxes and break-even
    Price(PriceArgs),
    /// Material cost and sales volume what-if scenarios
    Simulate(SimulateArgs),
    /// Target sales, margin and safety recommendations
    Recommend(RecommendArgs),
    /// Full pricing report
    Report(ReportArgs),
    /// Manage saved pricing notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn load_config(path: Option<&str>) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config: AnalysisConfig = input::file::read_json_or_yaml(path)?;
            debug!(path, ?config, "analysis config loaded");
            Ok(config)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Price(args) => commands::pricing::run_price(args, &config),
        Commands::Simulate(args) => commands::pricing::run_simulate(args, &config),
        Commands::Recommend(args) => commands::pricing::run_recommend(args, &config),
        Commands::Report(args) => commands::pricing::run_report(args, &config),
        Commands::Note(command) => commands::note::run_note(command, &cli.store, &config),
        Commands::Version => {
            println!("ngitung {}", env!("CARGO_PKG_VERSION"));
            Ok(serde_json::Value::Null)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.output.clone();

    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
