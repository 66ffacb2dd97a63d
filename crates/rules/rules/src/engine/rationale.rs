use inquisitor_core::{DecisionKind, RuleId};

use crate::engine::policy::Thresholds;
use crate::engine::scorer::ScoredItem;

/// Explain a threshold decision.
///
/// The output depends only on the decision kind, the matched and exculpatory
/// rule ids, the score and the thresholds.
#[must_use]
pub fn threshold_rationale(kind: DecisionKind, scored: &ScoredItem, thresholds: &Thresholds) -> String {
    match kind {
        DecisionKind::Mark => {
            let matched = join_ids(&scored.matched_rule_ids);
            let matched = if matched.is_empty() {
                "no listed rules".to_owned()
            } else {
                matched
            };
            format!("Matched {matched}; no benign context detected.")
        }
        DecisionKind::Acquit => {
            let exculpatory = join_ids(&scored.exculpatory_rule_ids);
            if exculpatory.is_empty() {
                "No taint was discerned within the text; the subject is cleared.".to_owned()
            } else {
                format!("Benign context matched ({exculpatory}); cleared as likely benign.")
            }
        }
        _ => {
            let mut rationale = format!(
                "Score {:.2} lies between the acquit ({:.2}) and mark ({:.2}) thresholds; held for review.",
                scored.clamped_score,
                thresholds.acquit(),
                thresholds.mark()
            );
            let matched = join_ids(&scored.matched_rule_ids);
            if !matched.is_empty() {
                rationale.push_str(&format!(" Matched {matched}."));
            }
            rationale
        }
    }
}

/// Comma-join ids, dropping repeats but keeping first-seen order.
fn join_ids(ids: &[RuleId]) -> String {
    let mut unique: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id.as_str()) {
            unique.push(id.as_str());
        }
    }
    unique.join(", ")
}

#[cfg(test)]
mod tests {
    use inquisitor_core::ItemId;

    use super::*;

    fn scored(score: f64, matched: &[&str], exculpatory: &[&str]) -> ScoredItem {
        ScoredItem {
            item_id: ItemId::new("t1"),
            raw_score: score,
            clamped_score: score.clamp(0.0, 1.0),
            matched_rule_ids: matched.iter().map(|s| RuleId::new(*s)).collect(),
            exculpatory_rule_ids: exculpatory.iter().map(|s| RuleId::new(*s)).collect(),
            hits: vec![],
        }
    }

    #[test]
    fn mark_cites_matched_rules() {
        let r = threshold_rationale(
            DecisionKind::Mark,
            &scored(0.9, &["H1", "H2"], &[]),
            &Thresholds::default(),
        );
        assert_eq!(r, "Matched H1, H2; no benign context detected.");
    }

    #[test]
    fn mark_without_matches_still_reads() {
        let r = threshold_rationale(
            DecisionKind::Mark,
            &scored(0.0, &[], &[]),
            &Thresholds::unchecked(0.0, 0.0),
        );
        assert_eq!(r, "Matched no listed rules; no benign context detected.");
    }

    #[test]
    fn acquit_cites_exculpatory_rules_once() {
        let r = threshold_rationale(
            DecisionKind::Acquit,
            &scored(0.1, &["H1"], &["H1", "H1", "H3"]),
            &Thresholds::default(),
        );
        assert_eq!(r, "Benign context matched (H1, H3); cleared as likely benign.");
    }

    #[test]
    fn acquit_without_exculpatory_reports_no_taint() {
        let r = threshold_rationale(
            DecisionKind::Acquit,
            &scored(0.0, &[], &[]),
            &Thresholds::default(),
        );
        assert_eq!(
            r,
            "No taint was discerned within the text; the subject is cleared."
        );
    }

    #[test]
    fn defer_reports_band() {
        let r = threshold_rationale(
            DecisionKind::Defer,
            &scored(0.5, &["H1"], &[]),
            &Thresholds::new(0.7, 0.2).unwrap(),
        );
        assert_eq!(
            r,
            "Score 0.50 lies between the acquit (0.20) and mark (0.70) thresholds; held for review. Matched H1."
        );
    }

    #[test]
    fn defer_without_matches_has_no_suffix() {
        let r = threshold_rationale(
            DecisionKind::Defer,
            &scored(0.5, &[], &[]),
            &Thresholds::new(0.7, 0.2).unwrap(),
        );
        assert!(r.ends_with("held for review."));
    }
}
