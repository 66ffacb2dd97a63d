use std::path::Path;

use inquisitor_rules::{
    GateClassifier, JsonFrontend, MatchLimits, RuleFile, RuleFrontend, RuleKind,
    ThresholdClassifier, ThresholdConfig, compile_gate_rules, compile_threshold_rules,
};
use inquisitor_rules_yaml::YamlFrontend;
use tracing::{info, warn};

use crate::config::DetectorConfig;
use crate::error::PipelineError;

/// Parse a rule file with the frontend that claims its extension.
///
/// Files with an unknown or missing extension are read as YAML.
pub fn load_rule_file(path: &Path) -> Result<RuleFile, PipelineError> {
    let frontends: [&dyn RuleFrontend; 2] = [&YamlFrontend, &JsonFrontend];
    let frontend = frontends
        .into_iter()
        .find(|f| f.handles(path))
        .unwrap_or(&YamlFrontend);
    Ok(frontend.parse_file(path)?)
}

/// Load, compile and wrap the threshold rules at `path`.
pub fn load_threshold_classifier(
    path: &Path,
    detector: &DetectorConfig,
    overrides: ThresholdConfig,
    limits: MatchLimits,
) -> Result<ThresholdClassifier, PipelineError> {
    let file = load_rule_file(path)?;
    let thresholds = detector.thresholds(file.thresholds, overrides)?;
    let rules = compile_threshold_rules(&file.rules)?;
    info!(
        path = %path.display(),
        rules = rules.len(),
        mark = thresholds.mark(),
        acquit = thresholds.acquit(),
        "threshold rules loaded"
    );
    if thresholds.is_inverted() {
        warn!(
            mark = thresholds.mark(),
            acquit = thresholds.acquit(),
            "mark threshold is below acquit threshold; no item will be deferred"
        );
    }
    Ok(ThresholdClassifier::new(rules, thresholds).with_limits(limits))
}

/// Load, compile and wrap the gate rules at `path`.
pub fn load_gate_classifier(
    path: &Path,
    limits: MatchLimits,
) -> Result<GateClassifier, PipelineError> {
    let file = load_rule_file(path)?;
    let rules = compile_gate_rules(&file.rules)?;
    info!(path = %path.display(), rules = rules.len(), "gate rules loaded");
    Ok(GateClassifier::new(rules).with_limits(limits))
}

/// Summary of a rule file that compiled cleanly.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RuleListing {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub category: String,
    /// Gate action, or the number of exculpatory patterns for threshold rules.
    pub detail: String,
}

/// Compile the rule file at `path` for `kind` without building a classifier.
pub fn validate_rule_file(path: &Path, kind: RuleKind) -> Result<Vec<RuleListing>, PipelineError> {
    let file = load_rule_file(path)?;
    let listing = match kind {
        RuleKind::Threshold => compile_threshold_rules(&file.rules)?
            .into_iter()
            .map(|rule| RuleListing {
                id: rule.id.to_string(),
                name: rule.display_name,
                weight: rule.weight,
                category: rule.category,
                detail: format!("{} exculpatory", rule.exculpatory.len()),
            })
            .collect(),
        RuleKind::Gate => compile_gate_rules(&file.rules)?
            .into_iter()
            .map(|rule| RuleListing {
                id: rule.id.to_string(),
                name: rule.display_name,
                weight: rule.weight,
                category: rule.category,
                detail: rule.action.to_string(),
            })
            .collect(),
    };
    Ok(listing)
}
