use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::policy::Thresholds;
use crate::error::{ConfigurationError, RuleError};

/// Threshold overrides carried by a detector rule file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default)]
    pub mark: Option<f64>,
    #[serde(default)]
    pub acquit: Option<f64>,
}

impl ThresholdConfig {
    /// Overlay these values on `fallback` without validating the result.
    #[must_use]
    pub fn overlay(&self, fallback: Thresholds) -> Thresholds {
        Thresholds::unchecked(
            self.mark.unwrap_or(fallback.mark()),
            self.acquit.unwrap_or(fallback.acquit()),
        )
    }

    /// Overlay these values on `fallback` and validate the merged pair.
    ///
    /// Both values must be finite and within `[0, 1]`. `allow_inverted`
    /// waives only the `mark >= acquit` ordering.
    pub fn resolve(
        &self,
        fallback: Thresholds,
        allow_inverted: bool,
    ) -> Result<Thresholds, ConfigurationError> {
        let merged = self.overlay(fallback);
        if allow_inverted {
            Thresholds::allowing_inverted(merged.mark(), merged.acquit())
        } else {
            Thresholds::new(merged.mark(), merged.acquit())
        }
    }
}

/// The parsed contents of a rule file, before compilation.
///
/// Rule definitions stay untyped so the compiler can report field-specific
/// errors instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<Value>,
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,
}

/// Trait for rule frontends that parse rule files from various formats.
///
/// Implementations provide parsing from a specific file format into a
/// [`RuleFile`]; compiling the definitions is left to the caller.
pub trait RuleFrontend: Send + Sync {
    /// Return the file extensions this frontend supports (e.g., `["yaml", "yml"]`).
    fn extensions(&self) -> &[&str];

    /// Parse a rule file from string content.
    fn parse(&self, content: &str) -> Result<RuleFile, RuleError>;

    /// Parse a rule file from a path.
    ///
    /// The default implementation reads the file and delegates to [`parse`](Self::parse).
    fn parse_file(&self, path: &Path) -> Result<RuleFile, RuleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Parse(format!("cannot read {}: {e}", path.display())))?;
        self.parse(&content)
    }

    /// Whether this frontend claims `path` by its extension.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Rule files written as a single JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFrontend;

impl RuleFrontend for JsonFrontend {
    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, content: &str) -> Result<RuleFile, RuleError> {
        serde_json::from_str(content).map_err(|e| RuleError::Parse(format!("JSON parse error: {e}")))
    }
}
