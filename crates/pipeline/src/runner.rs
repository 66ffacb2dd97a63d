use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use inquisitor_core::{DecisionRecord, Item, ItemId, RunSummary};
use inquisitor_rules::{Classifier, RuleError};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::intake::{Admission, IntakeFilter};
use crate::sink::DecisionSink;
use crate::source::SourceError;

/// Default number of items evaluated at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Drives a batch of items through the intake filter and a classifier,
/// handing each decision to a sink in input order.
///
/// Items are scored on the blocking thread pool. An item whose evaluation
/// fails with a per-item error is logged and counted as skipped; the rest of
/// the batch still runs. Sink failures abort the run.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    classifier: Arc<Classifier>,
    intake: IntakeFilter,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(classifier: impl Into<Classifier>) -> Self {
        Self {
            classifier: Arc::new(classifier.into()),
            intake: IntakeFilter::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn with_intake(mut self, intake: IntakeFilter) -> Self {
        self.intake = intake;
        self
    }

    /// Set the evaluation concurrency. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Run already-decoded items.
    pub async fn run<I>(&self, items: I, sink: &dyn DecisionSink) -> Result<RunSummary, PipelineError>
    where
        I: IntoIterator<Item = Item>,
    {
        self.run_entries(items.into_iter().map(Ok), sink).await
    }

    /// Run items straight from a source, counting undecodable entries as
    /// skipped.
    pub async fn run_entries<I>(
        &self,
        entries: I,
        sink: &dyn DecisionSink,
    ) -> Result<RunSummary, PipelineError>
    where
        I: IntoIterator<Item = Result<Item, SourceError>>,
    {
        let mut summary = RunSummary::default();
        let mut admitted = Vec::new();

        for entry in entries {
            summary.read += 1;
            let item = match entry {
                Ok(item) => item,
                Err(e) => {
                    warn!(line = e.line, error = %e.source, "skipping undecodable item");
                    summary.skipped += 1;
                    continue;
                }
            };
            match self.intake.admit(item.text()) {
                Admission::Kept { keywords_hit } => {
                    if !keywords_hit.is_empty() {
                        debug!(item_id = %item.id, ?keywords_hit, "item admitted");
                    }
                    admitted.push(item);
                }
                Admission::Discarded { reason } => {
                    debug!(item_id = %item.id, %reason, "item discarded");
                    summary.discarded += 1;
                }
            }
        }

        let mut results = stream::iter(admitted)
            .map(|item| evaluate(Arc::clone(&self.classifier), item))
            .buffered(self.concurrency);

        while let Some((item_id, result)) = results.next().await {
            match result {
                Ok(record) => {
                    summary.record(record.decision_kind);
                    sink.record(record).await?;
                }
                Err(EvalFailure::Item(e)) => {
                    warn!(item_id = %item_id, error = %e, "skipping item");
                    summary.skipped += 1;
                }
                Err(EvalFailure::Fatal(e)) => return Err(e.into()),
            }
        }

        sink.flush().await?;

        info!(
            read = summary.read,
            discarded = summary.discarded,
            skipped = summary.skipped,
            decided = summary.decided(),
            "batch run complete"
        );
        Ok(summary)
    }
}

enum EvalFailure {
    Item(String),
    Fatal(RuleError),
}

async fn evaluate(
    classifier: Arc<Classifier>,
    item: Item,
) -> (ItemId, Result<DecisionRecord, EvalFailure>) {
    let item_id = item.id.clone();
    let joined = tokio::task::spawn_blocking(move || classifier.evaluate(&item)).await;
    let result = match joined {
        Ok(Ok(record)) => Ok(record),
        Ok(Err(e)) if e.is_item_scoped() => Err(EvalFailure::Item(e.to_string())),
        Ok(Err(e)) => Err(EvalFailure::Fatal(e)),
        Err(e) => Err(EvalFailure::Item(format!("evaluation task failed: {e}"))),
    };
    (item_id, result)
}
