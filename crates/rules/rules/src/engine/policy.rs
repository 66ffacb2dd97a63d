use inquisitor_core::DecisionKind;
use serde::Serialize;

use crate::engine::scorer::GateScore;
use crate::error::ConfigurationError;

/// Flag score at which the gate classifier flags a draft. Not configurable.
pub const FLAG_THRESHOLD: f64 = 1.0;

/// Mark threshold used when none is configured.
pub const DEFAULT_MARK_THRESHOLD: f64 = 0.65;

/// Acquit threshold used when none is configured.
pub const DEFAULT_ACQUIT_THRESHOLD: f64 = 0.35;

/// Band boundaries of the three-band threshold classifier.
///
/// Built through [`Thresholds::new`] the pair is guaranteed finite, within
/// `[0, 1]` and ordered (`mark >= acquit`). [`Thresholds::allowing_inverted`]
/// keeps the range checks but accepts `mark < acquit`, so legacy
/// configurations keep their literal banding; use [`Thresholds::is_inverted`]
/// to detect the overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    mark: f64,
    acquit: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::unchecked(DEFAULT_MARK_THRESHOLD, DEFAULT_ACQUIT_THRESHOLD)
    }
}

impl Thresholds {
    /// Create validated thresholds.
    pub fn new(mark: f64, acquit: f64) -> Result<Self, ConfigurationError> {
        let thresholds = Self::allowing_inverted(mark, acquit)?;
        if thresholds.is_inverted() {
            return Err(ConfigurationError::Thresholds(format!(
                "mark ({mark}) must be >= acquit ({acquit})"
            )));
        }
        Ok(thresholds)
    }

    /// Create thresholds that must be finite and within `[0, 1]` but may be
    /// inverted.
    pub fn allowing_inverted(mark: f64, acquit: f64) -> Result<Self, ConfigurationError> {
        for (name, value) in [("mark", mark), ("acquit", acquit)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::Thresholds(format!(
                    "{name} must be a number in [0, 1], got {value}"
                )));
            }
        }
        Ok(Self::unchecked(mark, acquit))
    }

    /// Create thresholds without validation.
    #[must_use]
    pub const fn unchecked(mark: f64, acquit: f64) -> Self {
        Self { mark, acquit }
    }

    /// Scores at or above this are marked.
    #[must_use]
    pub fn mark(&self) -> f64 {
        self.mark
    }

    /// Scores at or below this are acquitted.
    #[must_use]
    pub fn acquit(&self) -> f64 {
        self.acquit
    }

    /// `true` when `mark < acquit`, i.e. the bands overlap and no score is
    /// ever deferred while some acquittable scores are marked instead.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.mark < self.acquit
    }

    /// Place a clamped score into its band.
    ///
    /// The mark comparison runs first, so under inverted thresholds a score
    /// satisfying both comparisons is marked.
    #[must_use]
    pub fn classify(&self, score: f64) -> DecisionKind {
        if score >= self.mark {
            DecisionKind::Mark
        } else if score <= self.acquit {
            DecisionKind::Acquit
        } else {
            DecisionKind::Defer
        }
    }
}

/// Confidence attached to a threshold decision.
#[must_use]
pub fn threshold_confidence(kind: DecisionKind, score: f64) -> f64 {
    let confidence = match kind {
        DecisionKind::Acquit => 1.0 - score,
        _ => score,
    };
    confidence.clamp(0.0, 1.0)
}

/// Reduce a gate score to an outcome.
///
/// Any `block` hit wins outright; otherwise the flag score is compared with
/// [`FLAG_THRESHOLD`].
#[must_use]
pub fn classify_gate(score: &GateScore) -> DecisionKind {
    if score.has_block() {
        DecisionKind::Block
    } else if score.flag_score >= FLAG_THRESHOLD {
        DecisionKind::Flag
    } else {
        DecisionKind::Allow
    }
}

/// Confidence attached to a gate decision.
#[must_use]
pub fn gate_confidence(kind: DecisionKind, score: &GateScore) -> f64 {
    let flag = score.flag_score.clamp(0.0, 1.0);
    match kind {
        DecisionKind::Block => 1.0,
        DecisionKind::Flag => flag,
        _ => 1.0 - flag,
    }
}

#[cfg(test)]
mod tests {
    use inquisitor_core::{GateAction, ItemId, MatchHit, RuleId};

    use super::*;

    fn gate_score(hits: &[(GateAction, f64)]) -> GateScore {
        let mut block_score = 0.0;
        let mut flag_score = 0.0;
        let hits = hits
            .iter()
            .enumerate()
            .map(|(i, (action, weight))| {
                match action {
                    GateAction::Block => block_score += weight,
                    GateAction::Flag => flag_score += weight,
                    GateAction::Note => {}
                }
                MatchHit {
                    rule_id: RuleId::new(format!("R{i}")),
                    snippet: "x".into(),
                    weight: *weight,
                    action: Some(*action),
                    category: Some("general".into()),
                }
            })
            .collect();
        GateScore {
            item_id: ItemId::new("d1"),
            hits,
            block_score,
            flag_score,
        }
    }

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert!((t.mark() - 0.65).abs() < f64::EPSILON);
        assert!((t.acquit() - 0.35).abs() < f64::EPSILON);
        assert!(!t.is_inverted());
    }

    #[test]
    fn three_bands() {
        let t = Thresholds::new(0.7, 0.2).unwrap();
        assert_eq!(t.classify(0.8), DecisionKind::Mark);
        assert_eq!(t.classify(0.7), DecisionKind::Mark);
        assert_eq!(t.classify(0.5), DecisionKind::Defer);
        assert_eq!(t.classify(0.2), DecisionKind::Acquit);
        assert_eq!(t.classify(0.0), DecisionKind::Acquit);
    }

    #[test]
    fn equal_thresholds_leave_no_defer_band() {
        let t = Thresholds::new(0.5, 0.5).unwrap();
        assert_eq!(t.classify(0.5), DecisionKind::Mark);
        assert_eq!(t.classify(0.49), DecisionKind::Acquit);
    }

    #[test]
    fn inverted_thresholds_rejected_by_new() {
        let err = Thresholds::new(0.2, 0.7).unwrap_err();
        assert!(err.to_string().contains("must be >= acquit"));
    }

    #[test]
    fn out_of_range_thresholds_rejected() {
        assert!(Thresholds::new(1.5, 0.2).is_err());
        assert!(Thresholds::new(0.7, -0.1).is_err());
        assert!(Thresholds::new(f64::NAN, 0.2).is_err());
    }

    #[test]
    fn allowing_inverted_still_checks_range() {
        assert!(Thresholds::allowing_inverted(0.2, 0.7).unwrap().is_inverted());
        assert!(Thresholds::allowing_inverted(f64::NAN, 0.35).is_err());
        assert!(Thresholds::allowing_inverted(5.0, -3.0).is_err());
        assert!(Thresholds::allowing_inverted(0.7, f64::INFINITY).is_err());
    }

    #[test]
    fn inverted_thresholds_keep_literal_banding() {
        let t = Thresholds::allowing_inverted(0.2, 0.7).unwrap();
        assert!(t.is_inverted());
        // Mark is checked first: 0.5 satisfies both comparisons.
        assert_eq!(t.classify(0.5), DecisionKind::Mark);
        assert_eq!(t.classify(0.1), DecisionKind::Acquit);
        // Nothing can be deferred.
        for i in 0..=100 {
            let score = f64::from(i) / 100.0;
            assert_ne!(t.classify(score), DecisionKind::Defer);
        }
    }

    #[test]
    fn threshold_confidence_by_kind() {
        assert!((threshold_confidence(DecisionKind::Mark, 0.8) - 0.8).abs() < 1e-9);
        assert!((threshold_confidence(DecisionKind::Acquit, 0.1) - 0.9).abs() < 1e-9);
        assert!((threshold_confidence(DecisionKind::Defer, 0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn block_wins_regardless_of_flag_score() {
        let score = gate_score(&[(GateAction::Block, 0.1), (GateAction::Flag, 5.0)]);
        assert_eq!(classify_gate(&score), DecisionKind::Block);
        assert!((gate_confidence(DecisionKind::Block, &score) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_weight_block_still_blocks() {
        let score = gate_score(&[(GateAction::Block, 0.0)]);
        assert_eq!(classify_gate(&score), DecisionKind::Block);
    }

    #[test]
    fn flag_at_threshold() {
        let score = gate_score(&[(GateAction::Flag, 0.5), (GateAction::Flag, 0.5)]);
        assert_eq!(classify_gate(&score), DecisionKind::Flag);
    }

    #[test]
    fn below_flag_threshold_allows() {
        let score = gate_score(&[(GateAction::Flag, 0.5)]);
        assert_eq!(classify_gate(&score), DecisionKind::Allow);
        assert!((gate_confidence(DecisionKind::Allow, &score) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn notes_never_change_outcome() {
        let score = gate_score(&[
            (GateAction::Note, 10.0),
            (GateAction::Note, 10.0),
            (GateAction::Flag, 0.4),
        ]);
        assert_eq!(classify_gate(&score), DecisionKind::Allow);
    }

    #[test]
    fn no_hits_allows_with_full_confidence() {
        let score = gate_score(&[]);
        assert_eq!(classify_gate(&score), DecisionKind::Allow);
        assert!((gate_confidence(DecisionKind::Allow, &score) - 1.0).abs() < f64::EPSILON);
    }
}
