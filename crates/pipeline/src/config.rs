use std::path::{Path, PathBuf};

use inquisitor_rules::engine::{
    DEFAULT_ACQUIT_THRESHOLD, DEFAULT_MARK_THRESHOLD, DEFAULT_MAX_TEXT_BYTES,
};
use inquisitor_rules::{ConfigurationError, MatchLimits, ThresholdConfig, Thresholds};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PipelineError;
use crate::intake::{DiscardRule, IntakeError, IntakeFilter, MatchPolicy};
use crate::runner::DEFAULT_CONCURRENCY;

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InquisitorConfig {
    /// Threshold classifier settings.
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Gate classifier settings.
    #[serde(default)]
    pub gate: GateConfig,
    /// Keyword gate applied before scoring.
    #[serde(default)]
    pub intake: IntakeConfig,
    /// Batch execution settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl InquisitorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from `path`, or use defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration for the three-band threshold classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Rule file to load.
    #[serde(default = "default_detector_rules")]
    pub rules_path: PathBuf,
    /// Scores at or above this are marked.
    #[serde(default = "default_mark")]
    pub mark: f64,
    /// Scores at or below this are acquitted.
    #[serde(default = "default_acquit")]
    pub acquit: f64,
    /// Accept `mark < acquit` and band literally instead of rejecting it.
    #[serde(default)]
    pub allow_inverted: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rules_path: default_detector_rules(),
            mark: default_mark(),
            acquit: default_acquit(),
            allow_inverted: false,
        }
    }
}

impl DetectorConfig {
    /// Resolve the effective thresholds.
    ///
    /// Precedence, lowest first: this section, the rule file's `thresholds`
    /// block, then explicit `overrides`. Only the merged pair is validated;
    /// `allow_inverted` relaxes the ordering check but never the range check.
    pub fn thresholds(
        &self,
        from_file: Option<ThresholdConfig>,
        overrides: ThresholdConfig,
    ) -> Result<Thresholds, ConfigurationError> {
        let base = Thresholds::unchecked(self.mark, self.acquit);
        let merged = from_file.unwrap_or_default().overlay(base);
        overrides.resolve(merged, self.allow_inverted)
    }
}

fn default_detector_rules() -> PathBuf {
    PathBuf::from("config/detector_rules.yml")
}

fn default_mark() -> f64 {
    DEFAULT_MARK_THRESHOLD
}

fn default_acquit() -> f64 {
    DEFAULT_ACQUIT_THRESHOLD
}

/// Configuration for the gate classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Rule file to load.
    #[serde(default = "default_gate_rules")]
    pub rules_path: PathBuf,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rules_path: default_gate_rules(),
        }
    }
}

fn default_gate_rules() -> PathBuf {
    PathBuf::from("config/policy_gate.yml")
}

/// Keyword gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub discard: Vec<DiscardRule>,
}

impl IntakeConfig {
    /// Compile this section into a filter.
    pub fn build(&self) -> Result<IntakeFilter, IntakeError> {
        IntakeFilter::new(&self.include, &self.exclude, self.match_policy)?
            .with_discard(&self.discard)
    }
}

/// Batch execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of items evaluated at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Texts larger than this are skipped with a per-item error.
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

impl PipelineConfig {
    pub fn limits(&self) -> MatchLimits {
        MatchLimits {
            max_text_bytes: self.max_text_bytes,
        }
    }
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_max_text_bytes() -> usize {
    DEFAULT_MAX_TEXT_BYTES
}
