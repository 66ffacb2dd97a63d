use inquisitor_core::{GateAction, ItemId, MatchHit, RawMatches, RuleId, raw_matches_from_hits};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::ir::rule::{GateRule, ThresholdRule};

/// Score deducted for every exculpatory pattern that matches, independent
/// of the owning rule's weight.
pub const EXCULPATORY_PENALTY: f64 = 0.2;

/// Default ceiling on the size of a single text.
pub const DEFAULT_MAX_TEXT_BYTES: usize = 1024 * 1024;

/// Guards applied before a text is matched against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLimits {
    /// Texts longer than this many bytes fail evaluation for that item only.
    pub max_text_bytes: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

impl MatchLimits {
    fn check(&self, item_id: &ItemId, text: &str) -> Result<(), RuleError> {
        if text.len() > self.max_text_bytes {
            return Err(RuleError::MatchEvaluation {
                item_id: item_id.clone(),
                message: format!(
                    "text is {} bytes, limit is {}",
                    text.len(),
                    self.max_text_bytes
                ),
            });
        }
        Ok(())
    }
}

/// Result of scoring one text with the threshold classifier's rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    /// The item that was scored.
    pub item_id: ItemId,
    /// Sum of weights minus exculpatory penalties. May be negative.
    pub raw_score: f64,
    /// `raw_score` clamped into `[0, 1]`.
    pub clamped_score: f64,
    /// Rules whose primary pattern matched, in rule order.
    pub matched_rule_ids: Vec<RuleId>,
    /// One entry per matching exculpatory pattern, holding the owning rule id.
    pub exculpatory_rule_ids: Vec<RuleId>,
    /// Primary matches with their first snippet, in rule order.
    pub hits: Vec<MatchHit>,
}

impl ScoredItem {
    /// Matched snippets per rule.
    #[must_use]
    pub fn raw_matches(&self) -> RawMatches {
        raw_matches_from_hits(&self.hits)
    }
}

/// Result of scoring one text with the gate classifier's rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateScore {
    /// The item that was scored.
    pub item_id: ItemId,
    /// Every matching rule, in rule order.
    pub hits: Vec<MatchHit>,
    /// Sum of weights of matching `block` rules. Not clamped.
    pub block_score: f64,
    /// Sum of weights of matching `flag` rules. Not clamped.
    pub flag_score: f64,
}

impl GateScore {
    /// Whether any matching rule has the `block` action.
    #[must_use]
    pub fn has_block(&self) -> bool {
        self.hits
            .iter()
            .any(|h| h.action == Some(GateAction::Block))
    }

    /// Rule ids of all hits, in rule order.
    #[must_use]
    pub fn matched_rule_ids(&self) -> Vec<RuleId> {
        self.hits.iter().map(|h| h.rule_id.clone()).collect()
    }

    /// Matched snippets per rule.
    #[must_use]
    pub fn raw_matches(&self) -> RawMatches {
        raw_matches_from_hits(&self.hits)
    }
}

/// Score a text against threshold rules.
///
/// Each matching primary pattern adds the rule weight once; each matching
/// exculpatory pattern subtracts [`EXCULPATORY_PENALTY`], whether or not the
/// primary pattern matched. The total is then clamped into `[0, 1]`.
pub fn score_threshold(
    rules: &[ThresholdRule],
    item_id: &ItemId,
    text: &str,
    limits: &MatchLimits,
) -> Result<ScoredItem, RuleError> {
    limits.check(item_id, text)?;

    let mut raw_score = 0.0;
    let mut matched_rule_ids = Vec::new();
    let mut exculpatory_rule_ids = Vec::new();
    let mut hits = Vec::new();

    for rule in rules {
        if let Some(snippet) = rule.pattern.find(text) {
            raw_score += rule.weight;
            matched_rule_ids.push(rule.id.clone());
            hits.push(MatchHit {
                rule_id: rule.id.clone(),
                snippet: snippet.to_owned(),
                weight: rule.weight,
                action: None,
                category: None,
            });
        }
        for pattern in &rule.exculpatory {
            if pattern.is_match(text) {
                raw_score -= EXCULPATORY_PENALTY;
                exculpatory_rule_ids.push(rule.id.clone());
            }
        }
    }

    Ok(ScoredItem {
        item_id: item_id.clone(),
        raw_score,
        clamped_score: raw_score.clamp(0.0, 1.0),
        matched_rule_ids,
        exculpatory_rule_ids,
        hits,
    })
}

/// Score a text against gate rules.
///
/// `note` rules are recorded as hits but add to neither score.
pub fn score_gate(
    rules: &[GateRule],
    item_id: &ItemId,
    text: &str,
    limits: &MatchLimits,
) -> Result<GateScore, RuleError> {
    limits.check(item_id, text)?;

    let mut hits = Vec::new();
    let mut block_score = 0.0;
    let mut flag_score = 0.0;

    for rule in rules {
        let Some(snippet) = rule.pattern.find(text) else {
            continue;
        };
        match rule.action {
            GateAction::Block => block_score += rule.weight,
            GateAction::Flag => flag_score += rule.weight,
            GateAction::Note => {}
        }
        hits.push(MatchHit {
            rule_id: rule.id.clone(),
            snippet: snippet.to_owned(),
            weight: rule.weight,
            action: Some(rule.action),
            category: Some(rule.category.clone()),
        });
    }

    Ok(GateScore {
        item_id: item_id.clone(),
        hits,
        block_score,
        flag_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::pattern::Pattern;

    fn p(src: &str) -> Pattern {
        Pattern::compile(src).unwrap()
    }

    fn id() -> ItemId {
        ItemId::new("t1")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn threshold_single_match() {
        let rules = vec![ThresholdRule::new("H1", p("heresy")).with_weight(0.8)];
        let scored =
            score_threshold(&rules, &id(), "This is blatant heresy.", &MatchLimits::default())
                .unwrap();
        assert!(approx(scored.raw_score, 0.8));
        assert!(approx(scored.clamped_score, 0.8));
        assert_eq!(scored.matched_rule_ids, vec![RuleId::new("H1")]);
        assert!(scored.exculpatory_rule_ids.is_empty());
        assert_eq!(scored.hits[0].snippet, "heresy");
    }

    #[test]
    fn threshold_no_match_scores_zero() {
        let rules = vec![ThresholdRule::new("H1", p("heresy")).with_weight(0.8)];
        let scored = score_threshold(
            &rules,
            &id(),
            "A calm discussion about supplies.",
            &MatchLimits::default(),
        )
        .unwrap();
        assert!(approx(scored.raw_score, 0.0));
        assert!(scored.matched_rule_ids.is_empty());
        assert!(scored.hits.is_empty());
    }

    #[test]
    fn repeated_occurrences_count_once() {
        let rules = vec![ThresholdRule::new("H1", p("heresy")).with_weight(0.3)];
        let scored = score_threshold(
            &rules,
            &id(),
            "heresy heresy heresy",
            &MatchLimits::default(),
        )
        .unwrap();
        assert!(approx(scored.raw_score, 0.3));
        assert_eq!(scored.raw_matches()[&RuleId::new("H1")].len(), 1);
    }

    #[test]
    fn exculpatory_subtracts_fixed_penalty() {
        let rules = vec![
            ThresholdRule::new("H1", p("heresy"))
                .with_weight(0.9)
                .with_exculpatory(p("tabletop")),
        ];
        let scored = score_threshold(
            &rules,
            &id(),
            "heresy in my tabletop campaign",
            &MatchLimits::default(),
        )
        .unwrap();
        assert!(approx(scored.raw_score, 0.9 - EXCULPATORY_PENALTY));
        assert_eq!(scored.exculpatory_rule_ids, vec![RuleId::new("H1")]);
    }

    #[test]
    fn exculpatory_applies_per_matching_pattern() {
        let rules = vec![
            ThresholdRule::new("H1", p("heresy"))
                .with_weight(0.1)
                .with_exculpatory(p("lore"))
                .with_exculpatory(p("game"))
                .with_exculpatory(p("unrelated")),
        ];
        let scored = score_threshold(
            &rules,
            &id(),
            "heresy is lore in this game",
            &MatchLimits::default(),
        )
        .unwrap();
        assert!(approx(scored.raw_score, 0.1 - 2.0 * EXCULPATORY_PENALTY));
        assert!(scored.raw_score < 0.0);
        assert!(approx(scored.clamped_score, 0.0));
        assert_eq!(
            scored.exculpatory_rule_ids,
            vec![RuleId::new("H1"), RuleId::new("H1")]
        );
    }

    #[test]
    fn exculpatory_checked_without_primary_match() {
        let rules = vec![
            ThresholdRule::new("H1", p("heresy"))
                .with_weight(0.8)
                .with_exculpatory(p("lore")),
        ];
        let scored =
            score_threshold(&rules, &id(), "just lore", &MatchLimits::default()).unwrap();
        assert!(scored.matched_rule_ids.is_empty());
        assert!(approx(scored.raw_score, -EXCULPATORY_PENALTY));
        assert!(approx(scored.clamped_score, 0.0));
    }

    #[test]
    fn score_clamps_at_one() {
        let rules = vec![
            ThresholdRule::new("A", p("alpha")).with_weight(0.7),
            ThresholdRule::new("B", p("beta")).with_weight(0.7),
        ];
        let scored =
            score_threshold(&rules, &id(), "alpha beta", &MatchLimits::default()).unwrap();
        assert!(approx(scored.raw_score, 1.4));
        assert!(approx(scored.clamped_score, 1.0));
    }

    #[test]
    fn match_order_follows_rule_order() {
        let rules = vec![
            ThresholdRule::new("Z", p("zeta")),
            ThresholdRule::new("A", p("alpha")),
        ];
        let scored =
            score_threshold(&rules, &id(), "alpha then zeta", &MatchLimits::default()).unwrap();
        assert_eq!(
            scored.matched_rule_ids,
            vec![RuleId::new("Z"), RuleId::new("A")]
        );
    }

    #[test]
    fn empty_text_matches_nothing_substantive() {
        let rules = vec![ThresholdRule::new("H1", p("heresy")).with_weight(0.8)];
        let scored = score_threshold(&rules, &id(), "", &MatchLimits::default()).unwrap();
        assert!(approx(scored.clamped_score, 0.0));
    }

    #[test]
    fn oversized_text_is_an_item_error() {
        let rules = vec![ThresholdRule::new("H1", p("heresy"))];
        let limits = MatchLimits { max_text_bytes: 4 };
        let err = score_threshold(&rules, &id(), "heresy", &limits).unwrap_err();
        assert!(err.is_item_scoped());
        assert!(err.to_string().contains("6 bytes, limit is 4"));
    }

    #[test]
    fn gate_accumulates_per_action() {
        let rules = vec![
            GateRule::new("B1", p("bomb")).with_action(GateAction::Block),
            GateRule::new("F1", p("spam")).with_weight(0.5),
            GateRule::new("N1", p("hello")).with_action(GateAction::Note),
        ];
        let score = score_gate(
            &rules,
            &id(),
            "hello, bomb and spam",
            &MatchLimits::default(),
        )
        .unwrap();
        assert!(approx(score.block_score, 1.0));
        assert!(approx(score.flag_score, 0.5));
        assert_eq!(score.hits.len(), 3);
        assert!(score.has_block());
        assert_eq!(score.hits[2].action, Some(GateAction::Note));
        assert_eq!(score.hits[0].category.as_deref(), Some("general"));
    }

    #[test]
    fn gate_flag_score_is_not_clamped() {
        let rules = vec![
            GateRule::new("F1", p("spam")).with_weight(0.9),
            GateRule::new("F2", p("scam")).with_weight(0.9),
        ];
        let score =
            score_gate(&rules, &id(), "spam scam", &MatchLimits::default()).unwrap();
        assert!(approx(score.flag_score, 1.8));
    }

    #[test]
    fn gate_snippet_keeps_original_case() {
        let rules = vec![GateRule::new("F1", p("spam"))];
        let score = score_gate(&rules, &id(), "Buy SPAM now", &MatchLimits::default()).unwrap();
        assert_eq!(score.raw_matches()[&RuleId::new("F1")], vec!["SPAM".to_owned()]);
        assert_eq!(score.matched_rule_ids(), vec![RuleId::new("F1")]);
    }
}
