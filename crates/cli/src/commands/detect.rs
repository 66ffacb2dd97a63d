use std::path::PathBuf;

use clap::Args;
use inquisitor_pipeline::{BatchRunner, InquisitorConfig, load_threshold_classifier};
use inquisitor_rules::ThresholdConfig;
use tracing::info;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// JSONL file with one item per line.
    #[arg(long)]
    pub input: PathBuf,
    /// Where to write decisions, one JSON object per line.
    #[arg(long)]
    pub output: PathBuf,
    /// Rule file. Defaults to `detector.rules_path` from the config.
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Mark threshold, overriding the config and rule file.
    #[arg(long)]
    pub mark: Option<f64>,
    /// Acquit threshold, overriding the config and rule file.
    #[arg(long)]
    pub acquit: Option<f64>,
    /// Score every item, ignoring the `[intake]` filter.
    #[arg(long)]
    pub no_intake: bool,
}

pub async fn run(
    config: &InquisitorConfig,
    args: &DetectArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let rules_path = args.rules.as_ref().unwrap_or(&config.detector.rules_path);
    let overrides = ThresholdConfig {
        mark: args.mark,
        acquit: args.acquit,
    };
    let classifier = load_threshold_classifier(
        rules_path,
        &config.detector,
        overrides,
        config.pipeline.limits(),
    )?;

    let mut runner = BatchRunner::new(classifier).with_concurrency(config.pipeline.concurrency);
    if !args.no_intake {
        let intake = config.intake.build()?;
        if intake.is_pass_through() {
            info!("no intake filter configured, scoring every item");
        }
        runner = runner.with_intake(intake);
    }

    let summary = super::execute(&runner, &args.input, &args.output).await?;
    super::print_summary(&summary, runner.classifier(), format)
}
