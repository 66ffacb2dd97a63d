use std::path::Path;

use async_trait::async_trait;
use inquisitor_core::DecisionRecord;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Errors raised while persisting decisions.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize decision: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for decision records.
///
/// The runner calls [`record`](Self::record) in input order and
/// [`flush`](Self::flush) once at the end of a run.
#[async_trait]
pub trait DecisionSink: Send + Sync {
    /// Persist one decision.
    async fn record(&self, record: DecisionRecord) -> Result<(), SinkError>;

    /// Make everything recorded so far durable.
    async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory sink. Suitable for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryDecisionSink {
    records: Mutex<Vec<DecisionRecord>>,
}

impl MemoryDecisionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded decisions, in recording order.
    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn into_records(self) -> Vec<DecisionRecord> {
        self.records.into_inner()
    }
}

#[async_trait]
impl DecisionSink for MemoryDecisionSink {
    async fn record(&self, record: DecisionRecord) -> Result<(), SinkError> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Writes one JSON object per line to an async writer.
pub struct JsonlDecisionSink<W> {
    writer: tokio::sync::Mutex<W>,
}

impl<W> JsonlDecisionSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: tokio::sync::Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonlDecisionSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub async fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).await?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

#[async_trait]
impl<W> DecisionSink for JsonlDecisionSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn record(&self, record: DecisionRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.lock().await.write_all(&line).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use inquisitor_core::{DecisionKind, ItemId, RawMatches};

    use super::*;

    fn record(id: &str, kind: DecisionKind) -> DecisionRecord {
        DecisionRecord {
            item_id: ItemId::new(id),
            decision_kind: kind,
            confidence: 1.0,
            score: 0.0,
            rationale: "r".into(),
            matched_rule_ids: vec![],
            exculpatory_rule_ids: vec![],
            raw_matches: RawMatches::new(),
            hits: vec![],
        }
    }

    #[tokio::test]
    async fn memory_sink_keeps_order() {
        let sink = MemoryDecisionSink::new();
        assert!(sink.is_empty());
        sink.record(record("a", DecisionKind::Mark)).await.unwrap();
        sink.record(record("b", DecisionKind::Acquit)).await.unwrap();
        sink.flush().await.unwrap();
        let ids: Vec<_> = sink
            .into_records()
            .into_iter()
            .map(|r| r.item_id.to_string())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn jsonl_sink_writes_one_object_per_line() {
        let sink = JsonlDecisionSink::new(Vec::new());
        sink.record(record("a", DecisionKind::Allow)).await.unwrap();
        sink.record(record("b", DecisionKind::Block)).await.unwrap();
        sink.flush().await.unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["item_id"], "a");
        assert_eq!(lines[1]["decision"], "block");
    }

    #[tokio::test]
    async fn jsonl_sink_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let sink = JsonlDecisionSink::create(&path).await.unwrap();
        sink.record(record("a", DecisionKind::Defer)).await.unwrap();
        sink.flush().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\"defer\""));
    }
}
