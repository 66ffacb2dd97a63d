pub mod config;
pub mod error;
pub mod intake;
pub mod loader;
pub mod runner;
pub mod sink;
pub mod source;

pub use config::{DetectorConfig, GateConfig, InquisitorConfig, IntakeConfig, PipelineConfig};
pub use error::PipelineError;
pub use intake::{Admission, DiscardRule, IntakeError, IntakeFilter, MatchPolicy};
pub use loader::{
    RuleListing, load_gate_classifier, load_rule_file, load_threshold_classifier,
    validate_rule_file,
};
pub use runner::{BatchRunner, DEFAULT_CONCURRENCY};
pub use sink::{DecisionSink, JsonlDecisionSink, MemoryDecisionSink, SinkError};
pub use source::{SourceError, parse_jsonl, read_jsonl};
