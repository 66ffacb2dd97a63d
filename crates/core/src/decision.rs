use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hit::MatchHit;
use crate::types::{ItemId, RuleId};

/// Discrete outcome of a classifier.
///
/// `Mark`, `Acquit` and `Defer` come from the threshold classifier; `Allow`,
/// `Flag` and `Block` from the gate classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Score reached the mark threshold.
    Mark,
    /// Score fell to or below the acquit threshold.
    Acquit,
    /// Score landed between the two thresholds; left unclassified.
    Defer,
    /// No blocking rule and not enough flag weight.
    Allow,
    /// Accumulated flag weight reached the flag threshold.
    Flag,
    /// At least one blocking rule matched.
    Block,
}

impl DecisionKind {
    /// Return the `snake_case` string representation (matches serde serialization).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mark => "mark",
            Self::Acquit => "acquit",
            Self::Defer => "defer",
            Self::Allow => "allow",
            Self::Flag => "flag",
            Self::Block => "block",
        }
    }

    /// Whether the outcome belongs to the gate classifier.
    #[must_use]
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::Allow | Self::Flag | Self::Block)
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snippets per rule id, ordered by rule id so serialization is stable.
pub type RawMatches = BTreeMap<RuleId, Vec<String>>;

/// The reduced outcome for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Which outcome was reached.
    pub kind: DecisionKind,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Deterministic explanation of the outcome.
    pub rationale: String,
    /// Matched snippets per rule.
    pub raw_matches: RawMatches,
}

/// The tuple handed to a persistence collaborator once per evaluated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The item that was evaluated.
    pub item_id: ItemId,
    /// The outcome.
    #[serde(rename = "decision")]
    pub decision_kind: DecisionKind,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Clamped score for the threshold classifier, flag score for the gate.
    pub score: f64,
    /// Deterministic explanation of the outcome.
    pub rationale: String,
    /// Rules whose primary pattern matched, in rule order.
    pub matched_rule_ids: Vec<RuleId>,
    /// Rules whose exculpatory patterns matched, one entry per pattern.
    #[serde(default)]
    pub exculpatory_rule_ids: Vec<RuleId>,
    /// Matched snippets per rule.
    pub raw_matches: RawMatches,
    /// Full hit details for audit, in rule order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<MatchHit>,
}

impl DecisionRecord {
    /// Wrap a classifier's [`Decision`] for `item_id` with the score it was
    /// reduced from.
    #[must_use]
    pub fn new(item_id: ItemId, decision: Decision, score: f64) -> Self {
        Self {
            item_id,
            decision_kind: decision.kind,
            confidence: decision.confidence,
            score,
            rationale: decision.rationale,
            matched_rule_ids: Vec::new(),
            exculpatory_rule_ids: Vec::new(),
            raw_matches: decision.raw_matches,
            hits: Vec::new(),
        }
    }

    /// Set the matched and exculpatory rule ids.
    #[must_use]
    pub fn with_rule_ids(mut self, matched: Vec<RuleId>, exculpatory: Vec<RuleId>) -> Self {
        self.matched_rule_ids = matched;
        self.exculpatory_rule_ids = exculpatory;
        self
    }

    /// Attach the full hit list.
    #[must_use]
    pub fn with_hits(mut self, hits: Vec<MatchHit>) -> Self {
        self.hits = hits;
        self
    }
}

/// Build the raw-match map from hits. Each rule contributes its first match.
#[must_use]
pub fn raw_matches_from_hits(hits: &[MatchHit]) -> RawMatches {
    let mut raw = RawMatches::new();
    for hit in hits {
        raw.entry(hit.rule_id.clone())
            .or_default()
            .push(hit.snippet.clone());
    }
    raw
}
