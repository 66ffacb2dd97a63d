pub mod detect;
pub mod gate;
pub mod rules;

use std::path::Path;

use inquisitor_core::{DecisionKind, RunSummary};
use inquisitor_pipeline::{BatchRunner, JsonlDecisionSink, read_jsonl};
use inquisitor_rules::Classifier;
use tracing::info;

use crate::OutputFormat;

/// Read `input`, run the batch and write decisions to `output`.
async fn execute(runner: &BatchRunner, input: &Path, output: &Path) -> anyhow::Result<RunSummary> {
    let entries = read_jsonl(input).await?;
    info!(
        input = %input.display(),
        entries = entries.len(),
        classifier = runner.classifier().kind().as_str(),
        rules = runner.classifier().rule_count(),
        "starting batch"
    );
    let sink = JsonlDecisionSink::create(output).await?;
    let summary = runner.run_entries(entries, &sink).await?;
    Ok(summary)
}

fn print_summary(
    summary: &RunSummary,
    classifier: &Classifier,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Text => {
            for line in summary_lines(summary, classifier) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Text summary: one totals line, then one line per outcome the classifier
/// can produce.
fn summary_lines(summary: &RunSummary, classifier: &Classifier) -> Vec<String> {
    let mut lines = vec![format!(
        "{} read, {} discarded, {} skipped, {} decided",
        summary.read,
        summary.discarded,
        summary.skipped,
        summary.decided()
    )];
    let counts = [
        (DecisionKind::Mark, summary.marked),
        (DecisionKind::Acquit, summary.acquitted),
        (DecisionKind::Defer, summary.deferred),
        (DecisionKind::Allow, summary.allowed),
        (DecisionKind::Flag, summary.flagged),
        (DecisionKind::Block, summary.blocked),
    ];
    lines.extend(
        counts
            .into_iter()
            .filter(|(kind, _)| classifier.produces(*kind))
            .map(|(kind, count)| format!("  {:<7} {count}", kind.as_str())),
    );
    lines
}
