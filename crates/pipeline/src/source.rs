use std::path::Path;

use inquisitor_core::Item;
use thiserror::Error;

use crate::error::PipelineError;

/// A JSONL line that could not be turned into an [`Item`].
#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct SourceError {
    /// 1-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Decode one item per non-blank line.
///
/// Bad lines are returned in place so the caller can count and report them
/// without losing the rest of the batch.
pub fn parse_jsonl(content: &str) -> Vec<Result<Item, SourceError>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| SourceError {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Read and decode a JSONL file.
pub async fn read_jsonl(path: &Path) -> Result<Vec<Result<Item, SourceError>>, PipelineError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_jsonl(&content))
}
