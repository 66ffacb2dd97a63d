use inquisitor_core::{GateAction, RuleId};

use super::pattern::Pattern;

/// Category assigned to rules that do not name one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Which classifier a rule set is compiled for.
///
/// The variant decides the defaults and which optional fields are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Three-band content triage (`mark` / `acquit` / `defer`).
    Threshold,
    /// Priority gate for drafts (`allow` / `flag` / `block`).
    Gate,
}

impl RuleKind {
    /// Weight used when a rule does not specify one.
    #[must_use]
    pub fn default_weight(self) -> f64 {
        match self {
            Self::Threshold => 0.5,
            Self::Gate => 1.0,
        }
    }

    /// Return the `snake_case` name used in logs and CLI output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Gate => "gate",
        }
    }
}

/// A compiled rule for the threshold classifier.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// Human-readable name. Falls back to the id.
    pub display_name: String,
    /// Primary pattern; a match adds `weight` to the score.
    pub pattern: Pattern,
    /// Score contribution of a primary match.
    pub weight: f64,
    /// Free-form grouping label.
    pub category: String,
    /// Secondary patterns that argue against the classification. Each match
    /// subtracts a fixed penalty.
    pub exculpatory: Vec<Pattern>,
}

impl ThresholdRule {
    /// Create a rule with the threshold defaults (weight 0.5, no exculpatory patterns).
    pub fn new(id: impl Into<RuleId>, pattern: Pattern) -> Self {
        let id = id.into();
        Self {
            display_name: id.to_string(),
            id,
            pattern,
            weight: RuleKind::Threshold.default_weight(),
            category: DEFAULT_CATEGORY.to_owned(),
            exculpatory: Vec::new(),
        }
    }

    /// Set the weight of this rule.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the display name of this rule.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the category of this rule.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Append an exculpatory pattern.
    #[must_use]
    pub fn with_exculpatory(mut self, pattern: Pattern) -> Self {
        self.exculpatory.push(pattern);
        self
    }
}

/// A compiled rule for the gate classifier.
#[derive(Debug, Clone)]
pub struct GateRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// Human-readable name. Falls back to the id.
    pub display_name: String,
    /// Pattern checked against the draft.
    pub pattern: Pattern,
    /// Contribution to the block or flag score.
    pub weight: f64,
    /// What a match asks for.
    pub action: GateAction,
    /// Grouping label used in summaries.
    pub category: String,
}

impl GateRule {
    /// Create a rule with the gate defaults (weight 1.0, action `flag`, category `general`).
    pub fn new(id: impl Into<RuleId>, pattern: Pattern) -> Self {
        let id = id.into();
        Self {
            display_name: id.to_string(),
            id,
            pattern,
            weight: RuleKind::Gate.default_weight(),
            action: GateAction::Flag,
            category: DEFAULT_CATEGORY.to_owned(),
        }
    }

    /// Set the weight of this rule.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the action of this rule.
    #[must_use]
    pub fn with_action(mut self, action: GateAction) -> Self {
        self.action = action;
        self
    }

    /// Set the category of this rule.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the display name of this rule.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}
