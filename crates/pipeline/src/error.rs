use std::path::PathBuf;

use inquisitor_rules::{ConfigurationError, RuleError};
use thiserror::Error;

use crate::intake::IntakeError;
use crate::sink::SinkError;

/// Errors that abort a pipeline run or its setup.
///
/// Per-item failures never surface here; the runner counts them as skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigurationError> for PipelineError {
    fn from(err: ConfigurationError) -> Self {
        Self::Rules(RuleError::Configuration(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_keep_their_message() {
        let err = PipelineError::from(ConfigurationError::DuplicateId("H1".into()));
        assert_eq!(
            err.to_string(),
            "configuration error: duplicate rule id `H1`"
        );
    }

    #[test]
    fn io_error_names_the_path() {
        let err = PipelineError::Io {
            path: PathBuf::from("items.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "cannot read items.jsonl: gone");
    }
}
