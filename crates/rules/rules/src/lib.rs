pub mod compiler;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod ir;

pub use compiler::{compile_gate_rules, compile_threshold_rules};
pub use engine::{
    Classifier, GateClassifier, GateScore, HeuristicSummarizer, MatchLimits, ScoredItem,
    Summarizer, ThresholdClassifier, Thresholds,
};
pub use error::{ConfigurationError, RuleError};
pub use frontend::{JsonFrontend, RuleFile, RuleFrontend, ThresholdConfig};
pub use ir::pattern::Pattern;
pub use ir::rule::{GateRule, RuleKind, ThresholdRule};
