//! Inquisitor CLI
//!
//! Classifies JSONL batches with the threshold detector or the draft gate,
//! and validates rule files.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inquisitor_pipeline::InquisitorConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Inquisitor CLI: rule-based scoring and decisions for text.
#[derive(Parser, Debug)]
#[command(name = "inquisitor", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        long,
        env = "INQUISITOR_CONFIG",
        default_value = "inquisitor.toml",
        global = true
    )]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify items as mark, acquit or defer.
    Detect(commands::detect::DetectArgs),
    /// Classify drafts as allow, flag or block.
    Gate(commands::gate::GateArgs),
    /// Inspect rule files.
    Rules(commands::rules::RulesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = InquisitorConfig::load(&cli.config)?;

    match cli.command {
        Command::Detect(args) => commands::detect::run(&config, &args, &cli.format).await,
        Command::Gate(args) => commands::gate::run(&config, &args, &cli.format).await,
        Command::Rules(args) => commands::rules::run(&args, &cli.format),
    }
}
