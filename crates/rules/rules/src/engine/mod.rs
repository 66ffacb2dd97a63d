pub mod classifier;
pub mod policy;
pub mod rationale;
pub mod scorer;
pub mod summarizer;

pub use classifier::{Classifier, GateClassifier, ThresholdClassifier};
pub use policy::{
    DEFAULT_ACQUIT_THRESHOLD, DEFAULT_MARK_THRESHOLD, FLAG_THRESHOLD, Thresholds, classify_gate,
    gate_confidence, threshold_confidence,
};
pub use rationale::threshold_rationale;
pub use scorer::{
    DEFAULT_MAX_TEXT_BYTES, EXCULPATORY_PENALTY, GateScore, MatchLimits, ScoredItem, score_gate,
    score_threshold,
};
pub use summarizer::{HeuristicSummarizer, Summarizer};
