use std::path::Path;

use inquisitor_rules::{RuleError, RuleFile, RuleFrontend};

/// A [`RuleFrontend`] implementation that parses YAML rule files.
///
/// The document must be a mapping. Its `rules` sequence is kept as untyped
/// definitions for the rule compiler; a detector file may also carry a
/// `thresholds` mapping. Other top-level keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontend;

impl RuleFrontend for YamlFrontend {
    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<RuleFile, RuleError> {
        parse_document(content).map_err(|e| RuleError::Parse(format!("YAML parse error: {e}")))
    }

    fn parse_file(&self, path: &Path) -> Result<RuleFile, RuleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Parse(format!("cannot read {}: {e}", path.display())))?;

        parse_document(&content).map_err(|e| {
            RuleError::Parse(format!("YAML parse error in {}: {e}", path.display()))
        })
    }
}

fn parse_document(content: &str) -> Result<RuleFile, serde_yaml_ng::Error> {
    // An empty document deserializes as unit, not as a mapping.
    if content.trim().is_empty() {
        return Ok(RuleFile::default());
    }
    serde_yaml_ng::from_str(content)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use inquisitor_core::{DecisionKind, Item};
    use inquisitor_rules::{
        ConfigurationError, GateClassifier, ThresholdClassifier, Thresholds,
        compile_gate_rules, compile_threshold_rules,
    };
    use serde_json::json;

    use super::*;

    const DETECTOR_RULES: &str = r#"
thresholds:
  mark: 0.7
  acquit: 0.2
owner: trust-and-safety
rules:
  - id: H1
    name: Heresy mention
    pattern: heresy
    weight: 0.8
    exculpatory:
      - warhammer lore
      - tabletop
  - id: 42
    pattern: '\bdaemon\b'
"#;

    const GATE_RULES: &str = r"
rules:
  - id: B1
    pattern: bomb
    action: block
    category: violence
  - id: F1
    pattern: spam
    weight: 0.5
    action: flag
  - id: N1
    pattern: lol
    action: note
    category: tone
";

    #[test]
    fn extensions() {
        assert_eq!(YamlFrontend.extensions(), &["yaml", "yml"]);
        assert!(YamlFrontend.handles(Path::new("config/detector_rules.yml")));
    }

    #[test]
    fn parses_rules_and_thresholds() {
        let file = YamlFrontend.parse(DETECTOR_RULES).unwrap();
        assert_eq!(file.rules.len(), 2);
        assert_eq!(file.rules[0]["exculpatory"], json!(["warhammer lore", "tabletop"]));
        let thresholds = file.thresholds.unwrap();
        assert_eq!(thresholds.mark, Some(0.7));
        assert_eq!(thresholds.acquit, Some(0.2));
    }

    #[test]
    fn parsed_detector_rules_compile_and_classify() {
        let file = YamlFrontend.parse(DETECTOR_RULES).unwrap();
        let thresholds = file
            .thresholds
            .unwrap_or_default()
            .resolve(Thresholds::default(), false)
            .unwrap();
        let classifier = ThresholdClassifier::from_definitions(&file.rules, thresholds).unwrap();
        assert_eq!(classifier.rules()[1].id.as_str(), "42");

        let record = classifier
            .evaluate(&Item::new("t1", "This is blatant heresy."))
            .unwrap();
        assert_eq!(record.decision_kind, DecisionKind::Mark);
    }

    #[test]
    fn parsed_gate_rules_compile() {
        let file = YamlFrontend.parse(GATE_RULES).unwrap();
        assert!(file.thresholds.is_none());
        let rules = compile_gate_rules(&file.rules).unwrap();
        assert_eq!(rules.len(), 3);
        let classifier = GateClassifier::new(rules);
        let record = classifier.evaluate(&Item::new("d1", "bomb")).unwrap();
        assert_eq!(record.decision_kind, DecisionKind::Block);
    }

    #[test]
    fn missing_rules_key_yields_empty_set() {
        let file = YamlFrontend.parse("owner: nobody\n").unwrap();
        assert!(file.rules.is_empty());
        assert!(YamlFrontend.parse("").unwrap().rules.is_empty());
    }

    #[test]
    fn rule_without_id_is_reported_by_compiler() {
        let file = YamlFrontend.parse("rules:\n  - pattern: heresy\n").unwrap();
        let err = compile_threshold_rules(&file.rules).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingField {
                index: 0,
                field: "id"
            }
        );
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = YamlFrontend.parse("rules: [unclosed").unwrap_err();
        assert!(err.to_string().contains("YAML parse error"));
    }

    #[test]
    fn non_sequence_rules_is_a_parse_error() {
        let err = YamlFrontend.parse("rules: heresy\n").unwrap_err();
        assert!(matches!(err, RuleError::Parse(_)));
    }

    #[test]
    fn parse_file_reports_path() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(GATE_RULES.as_bytes()).unwrap();
        let parsed = YamlFrontend.parse_file(file.path()).unwrap();
        assert_eq!(parsed.rules.len(), 3);

        let err = YamlFrontend
            .parse_file(Path::new("/nonexistent/rules.yml"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.yml"));
    }
}
