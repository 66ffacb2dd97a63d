use inquisitor_core::ItemId;
use thiserror::Error;

/// Errors that can occur while loading, compiling, or evaluating rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Malformed or incomplete rule/threshold configuration. Always fatal
    /// and raised before any text is scored.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Evaluating the rule set against one item failed. Scoped to that item.
    #[error("match evaluation failed for item {item_id}: {message}")]
    MatchEvaluation {
        /// The item whose evaluation failed.
        item_id: ItemId,
        /// What went wrong.
        message: String,
    },

    /// A rule file could not be read or parsed by a frontend.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RuleError {
    /// Whether the error only affects a single item and the batch may continue.
    #[must_use]
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, Self::MatchEvaluation { .. })
    }
}

/// A rule or threshold definition failed validation.
///
/// Every variant names the offending rule (by id, or by `#index` when the id
/// itself is unusable) and the field at fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("configuration error: rule #{index}: expected a map, got {found}")]
    NotAMap { index: usize, found: &'static str },

    #[error("configuration error: rule #{index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("configuration error: rule {rule}: field `{field}` is invalid: {reason}")]
    InvalidField {
        rule: String,
        field: &'static str,
        reason: String,
    },

    #[error("configuration error: rule {rule}: invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        reason: String,
    },

    #[error("configuration error: duplicate rule id `{0}`")]
    DuplicateId(String),

    #[error("configuration error: invalid thresholds: {0}")]
    Thresholds(String),
}
