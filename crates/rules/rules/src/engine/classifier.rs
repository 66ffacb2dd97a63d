use std::sync::Arc;

use inquisitor_core::{Decision, DecisionKind, DecisionRecord, Item};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::compiler::{compile_gate_rules, compile_threshold_rules};
use crate::engine::policy::{
    Thresholds, classify_gate, gate_confidence, threshold_confidence,
};
use crate::engine::rationale::threshold_rationale;
use crate::engine::scorer::{GateScore, MatchLimits, ScoredItem, score_gate, score_threshold};
use crate::engine::summarizer::{HeuristicSummarizer, Summarizer};
use crate::error::RuleError;
use crate::ir::rule::{GateRule, RuleKind, ThresholdRule};

/// Three-band classifier for content triage.
///
/// Cheap to clone; the compiled rules are shared and never mutated.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    rules: Arc<[ThresholdRule]>,
    thresholds: Thresholds,
    limits: MatchLimits,
}

impl ThresholdClassifier {
    /// Create a classifier over already-compiled rules.
    pub fn new(rules: Vec<ThresholdRule>, thresholds: Thresholds) -> Self {
        Self {
            rules: rules.into(),
            thresholds,
            limits: MatchLimits::default(),
        }
    }

    /// Compile raw rule definitions and build a classifier from them.
    pub fn from_definitions(
        definitions: &[Value],
        thresholds: Thresholds,
    ) -> Result<Self, RuleError> {
        Ok(Self::new(compile_threshold_rules(definitions)?, thresholds))
    }

    /// Set the match limits.
    #[must_use]
    pub fn with_limits(mut self, limits: MatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The compiled rules, in evaluation order.
    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Score an item without classifying it.
    pub fn score(&self, item: &Item) -> Result<ScoredItem, RuleError> {
        score_threshold(&self.rules, &item.id, item.text(), &self.limits)
    }

    /// Score, classify and explain one item.
    #[instrument(level = "debug", skip_all, fields(item_id = %item.id))]
    pub fn evaluate(&self, item: &Item) -> Result<DecisionRecord, RuleError> {
        let scored = self.score(item)?;
        let kind = self.thresholds.classify(scored.clamped_score);
        let rationale = threshold_rationale(kind, &scored, &self.thresholds);
        debug!(decision = %kind, score = scored.clamped_score, "threshold decision");

        let decision = Decision {
            kind,
            confidence: threshold_confidence(kind, scored.clamped_score),
            rationale,
            raw_matches: scored.raw_matches(),
        };
        Ok(
            DecisionRecord::new(scored.item_id, decision, scored.clamped_score)
                .with_rule_ids(scored.matched_rule_ids, scored.exculpatory_rule_ids)
                .with_hits(scored.hits),
        )
    }
}

/// Priority gate classifier for draft approval.
#[derive(Debug, Clone)]
pub struct GateClassifier {
    rules: Arc<[GateRule]>,
    summarizer: Arc<dyn Summarizer>,
    limits: MatchLimits,
}

impl GateClassifier {
    /// Create a classifier over already-compiled rules using the built-in
    /// heuristic summarizer.
    pub fn new(rules: Vec<GateRule>) -> Self {
        Self {
            rules: rules.into(),
            summarizer: Arc::new(HeuristicSummarizer),
            limits: MatchLimits::default(),
        }
    }

    /// Compile raw rule definitions and build a classifier from them.
    pub fn from_definitions(definitions: &[Value]) -> Result<Self, RuleError> {
        Ok(Self::new(compile_gate_rules(definitions)?))
    }

    /// Replace the summarizer used for rationales.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Set the match limits.
    #[must_use]
    pub fn with_limits(mut self, limits: MatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The compiled rules, in evaluation order.
    pub fn rules(&self) -> &[GateRule] {
        &self.rules
    }

    /// Score an item without classifying it.
    pub fn score(&self, item: &Item) -> Result<GateScore, RuleError> {
        score_gate(&self.rules, &item.id, item.text(), &self.limits)
    }

    /// Score, classify and explain one draft.
    #[instrument(level = "debug", skip_all, fields(item_id = %item.id))]
    pub fn evaluate(&self, item: &Item) -> Result<DecisionRecord, RuleError> {
        let score = self.score(item)?;
        let kind = classify_gate(&score);
        let rationale = self.summarizer.summarize(item.text(), &score.hits);
        debug!(
            decision = %kind,
            flag_score = score.flag_score,
            block_score = score.block_score,
            "gate decision"
        );

        let decision = Decision {
            kind,
            confidence: gate_confidence(kind, &score),
            rationale,
            raw_matches: score.raw_matches(),
        };
        let matched = score.matched_rule_ids();
        Ok(
            DecisionRecord::new(score.item_id, decision, score.flag_score)
                .with_rule_ids(matched, Vec::new())
                .with_hits(score.hits),
        )
    }
}

/// The closed set of classification strategies.
#[derive(Debug, Clone)]
pub enum Classifier {
    /// Three-band `mark` / `acquit` / `defer`.
    Threshold(ThresholdClassifier),
    /// Priority `allow` / `flag` / `block`.
    Gate(GateClassifier),
}

impl Classifier {
    /// Evaluate one item with whichever strategy is configured.
    pub fn evaluate(&self, item: &Item) -> Result<DecisionRecord, RuleError> {
        match self {
            Self::Threshold(c) => c.evaluate(item),
            Self::Gate(c) => c.evaluate(item),
        }
    }

    /// Which rule variant this classifier runs.
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Threshold(_) => RuleKind::Threshold,
            Self::Gate(_) => RuleKind::Gate,
        }
    }

    /// Number of compiled rules.
    pub fn rule_count(&self) -> usize {
        match self {
            Self::Threshold(c) => c.rules().len(),
            Self::Gate(c) => c.rules().len(),
        }
    }

    /// Whether `kind` is an outcome this classifier can produce.
    pub fn produces(&self, kind: DecisionKind) -> bool {
        match self {
            Self::Threshold(_) => !kind.is_gate(),
            Self::Gate(_) => kind.is_gate(),
        }
    }
}

impl From<ThresholdClassifier> for Classifier {
    fn from(c: ThresholdClassifier) -> Self {
        Self::Threshold(c)
    }
}

impl From<GateClassifier> for Classifier {
    fn from(c: GateClassifier) -> Self {
        Self::Gate(c)
    }
}
