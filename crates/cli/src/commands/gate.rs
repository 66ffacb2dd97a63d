use std::path::PathBuf;

use clap::Args;
use inquisitor_pipeline::{BatchRunner, InquisitorConfig, load_gate_classifier};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct GateArgs {
    /// JSONL file with one draft per line.
    #[arg(long)]
    pub input: PathBuf,
    /// Where to write decisions, one JSON object per line.
    #[arg(long)]
    pub output: PathBuf,
    /// Rule file. Defaults to `gate.rules_path` from the config.
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

pub async fn run(
    config: &InquisitorConfig,
    args: &GateArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let rules_path = args.rules.as_ref().unwrap_or(&config.gate.rules_path);
    let classifier = load_gate_classifier(rules_path, config.pipeline.limits())?;
    let runner = BatchRunner::new(classifier).with_concurrency(config.pipeline.concurrency);

    let summary = super::execute(&runner, &args.input, &args.output).await?;
    super::print_summary(&summary, runner.classifier(), format)
}
