use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use tidewatch_schemas::source::ConcentrationLevel;

mod config;
mod logging;
mod plotting;
mod workflow;

/// Contaminant diffusion and coastal pollution risk estimation.
#[derive(Parser)]
#[command(name = "tidewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Contaminant diffusion and coastal pollution risk estimation", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,

    /// Directory holding sources/, zones/ and scenarios/ YAML files
    #[arg(long, default_value = "./data/knowledge_base")]
    knowledge_base: String,

    /// Parent directory for run outputs
    #[arg(long, default_value = "./data/runs")]
    output_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the concentration for a single JSON request
    Predict {
        #[arg(short, long)]
        request: String,
    },
    /// Predict along a transect of distances (km) from a JSON request
    Transect {
        #[arg(short, long)]
        request: String,
        #[arg(long, value_delimiter = ',')]
        distances: Option<Vec<f64>>,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Superpose every source at one point
    Probe {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Evaluate the field over a lat/lng grid
    Scan {
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        #[arg(long, default_value_t = 40)]
        rows: usize,
        #[arg(long, default_value_t = 60)]
        cols: usize,
        #[arg(long, default_value_t = 1.0)]
        threshold: f64,
        #[command(flatten)]
        field: FieldArgs,
    },
}

#[derive(clap::Args)]
pub struct FieldArgs {
    /// Time slot id; defaults to the last slot in the knowledge base
    #[arg(long)]
    slot: Option<String>,
    /// Zone level (low, medium, high)
    #[arg(long, value_parser = parse_level, default_value = "medium")]
    zone_level: ConcentrationLevel,
    /// Seed for the natural-variation RNG; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_level(s: &str) -> Result<ConcentrationLevel, String> {
    match s.to_lowercase().as_str() {
        "low" => Ok(ConcentrationLevel::Low),
        "medium" => Ok(ConcentrationLevel::Medium),
        "high" => Ok(ConcentrationLevel::High),
        other => Err(format!("unknown zone level '{}'", other)),
    }
}

fn run_dir(output_dir: &str, command: &str) -> Result<String> {
    let dir = format!("{}/{}_{}", output_dir, command, chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory: {}", dir))?;
    Ok(dir)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Predict { request } => workflow::run_predict(&request),
        Commands::Transect { request, distances, threshold } => {
            let out = run_dir(&cli.output_dir, "transect")?;
            workflow::run_transect(&request, distances.as_deref(), threshold, &out)
        }
        Commands::Probe { lat, lng, field } => {
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;
            let out = run_dir(&cli.output_dir, "probe")?;
            workflow::run_probe(&kb, lat, lng, &field, &out)
        }
        Commands::Scan { south, west, north, east, rows, cols, threshold, field } => {
            let kb = config::KnowledgeBase::load(&cli.knowledge_base)?;
            let out = run_dir(&cli.output_dir, "scan")?;
            let bounds = tidewatch_core::field::scan::GridBounds { south, west, north, east };
            workflow::run_scan(&kb, &bounds, rows, cols, threshold, &field, &out)
        }
    }
}
