use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::RuleId;

/// What a gate rule asks for when its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    /// Audit annotation only; never changes the outcome.
    Note,
    /// Contributes the rule weight to the flag score.
    #[default]
    Flag,
    /// Blocks the draft outright.
    Block,
}

impl GateAction {
    /// Return the `snake_case` string representation (matches serde serialization).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Flag => "flag",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" => Ok(Self::Note),
            "flag" => Ok(Self::Flag),
            "block" => Ok(Self::Block),
            other => Err(format!("expected one of note|flag|block, got {other:?}")),
        }
    }
}

/// A single rule firing against a single text.
///
/// `action` and `category` are populated for gate rules only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHit {
    /// The rule that matched.
    pub rule_id: RuleId,
    /// The first matched substring.
    pub snippet: String,
    /// The rule weight at the time of the match.
    pub weight: f64,
    /// Gate action of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<GateAction>,
    /// Gate category of the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_action_parse_and_display() {
        for action in [GateAction::Note, GateAction::Flag, GateAction::Block] {
            assert_eq!(action.as_str().parse::<GateAction>().unwrap(), action);
            assert_eq!(action.to_string(), action.as_str());
        }
        assert!("deny".parse::<GateAction>().is_err());
        assert!("Block".parse::<GateAction>().is_err());
    }

    #[test]
    fn gate_action_defaults_to_flag() {
        assert_eq!(GateAction::default(), GateAction::Flag);
    }

    #[test]
    fn threshold_hit_omits_gate_fields() {
        let hit = MatchHit {
            rule_id: RuleId::new("H1"),
            snippet: "heresy".into(),
            weight: 0.8,
            action: None,
            category: None,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rule_id": "H1", "snippet": "heresy", "weight": 0.8})
        );
    }

    #[test]
    fn gate_hit_serializes_action_snake_case() {
        let hit = MatchHit {
            rule_id: RuleId::new("B1"),
            snippet: "bomb".into(),
            weight: 1.0,
            action: Some(GateAction::Block),
            category: Some("violence".into()),
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["action"], "block");
        assert_eq!(json["category"], "violence");
    }
}
