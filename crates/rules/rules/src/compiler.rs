//! Validation and compilation of loosely-typed rule definitions.
//!
//! Rule files arrive as untyped records (YAML, JSON or built in code). The
//! compiler turns each record into a strongly-typed [`ThresholdRule`] or
//! [`GateRule`] with its patterns pre-compiled. The first malformed record
//! aborts the whole batch; no partial rule set is ever returned.

use std::collections::HashSet;

use inquisitor_core::{GateAction, RuleId};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConfigurationError;
use crate::ir::pattern::Pattern;
use crate::ir::rule::{DEFAULT_CATEGORY, GateRule, RuleKind, ThresholdRule};

/// Compile threshold-classifier rules.
///
/// Defaults: `weight = 0.5`, `exculpatory = []`, `category = "general"`.
pub fn compile_threshold_rules(
    definitions: &[Value],
) -> Result<Vec<ThresholdRule>, ConfigurationError> {
    let rules = compile_all(definitions, |raw| {
        let exculpatory = raw
            .string_list("exculpatory")?
            .into_iter()
            .map(|src| raw.pattern("exculpatory", src))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ThresholdRule {
            id: raw.id.clone(),
            display_name: raw.display_name()?,
            pattern: raw.primary_pattern()?,
            weight: raw.weight(RuleKind::Threshold)?,
            category: raw.category()?,
            exculpatory,
        })
    })?;
    debug!(count = rules.len(), kind = "threshold", "compiled rule set");
    Ok(rules)
}

/// Compile gate-classifier rules.
///
/// Defaults: `weight = 1.0`, `action = "flag"`, `category = "general"`.
pub fn compile_gate_rules(definitions: &[Value]) -> Result<Vec<GateRule>, ConfigurationError> {
    let rules = compile_all(definitions, |raw| {
        Ok(GateRule {
            id: raw.id.clone(),
            display_name: raw.display_name()?,
            pattern: raw.primary_pattern()?,
            weight: raw.weight(RuleKind::Gate)?,
            action: raw.action()?,
            category: raw.category()?,
        })
    })?;
    debug!(count = rules.len(), kind = "gate", "compiled rule set");
    Ok(rules)
}

fn compile_all<R>(
    definitions: &[Value],
    build: impl Fn(&RawRule<'_>) -> Result<R, ConfigurationError>,
) -> Result<Vec<R>, ConfigurationError> {
    let mut seen = HashSet::with_capacity(definitions.len());
    let mut rules = Vec::with_capacity(definitions.len());

    for (index, definition) in definitions.iter().enumerate() {
        let raw = RawRule::new(index, definition)?;
        if !seen.insert(raw.id.clone()) {
            return Err(ConfigurationError::DuplicateId(raw.id.to_string()));
        }
        rules.push(build(&raw)?);
    }
    Ok(rules)
}

/// One untyped rule record with its id already validated.
struct RawRule<'a> {
    id: RuleId,
    fields: &'a Map<String, Value>,
}

impl<'a> RawRule<'a> {
    fn new(index: usize, definition: &'a Value) -> Result<Self, ConfigurationError> {
        let Some(fields) = definition.as_object() else {
            return Err(ConfigurationError::NotAMap {
                index,
                found: type_name(definition),
            });
        };

        let id = match fields.get("id") {
            None | Some(Value::Null) => {
                return Err(ConfigurationError::MissingField { index, field: "id" });
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(ConfigurationError::InvalidField {
                    rule: format!("#{index}"),
                    field: "id",
                    reason: "must not be empty".to_owned(),
                });
            }
            Some(Value::String(s)) => RuleId::new(s.as_str()),
            // YAML happily reads `id: 7` as a number; keep it usable.
            Some(Value::Number(n)) => RuleId::new(n.to_string()),
            Some(other) => {
                return Err(ConfigurationError::InvalidField {
                    rule: format!("#{index}"),
                    field: "id",
                    reason: format!("expected a string, got {}", type_name(other)),
                });
            }
        };

        if !matches!(fields.get("pattern"), Some(v) if !v.is_null()) {
            return Err(ConfigurationError::MissingField {
                index,
                field: "pattern",
            });
        }

        Ok(Self { id, fields })
    }

    /// Look up an optional field, treating explicit `null` as absent.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::InvalidField {
            rule: self.id.to_string(),
            field,
            reason: reason.into(),
        }
    }

    fn optional_str(&self, field: &'static str) -> Result<Option<&'a str>, ConfigurationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid(
                field,
                format!("expected a string, got {}", type_name(other)),
            )),
        }
    }

    fn display_name(&self) -> Result<String, ConfigurationError> {
        let name = match self.optional_str("name")? {
            Some(name) => Some(name),
            None => self.optional_str("displayName")?,
        };
        Ok(name.map_or_else(|| self.id.to_string(), str::to_owned))
    }

    fn category(&self) -> Result<String, ConfigurationError> {
        Ok(self
            .optional_str("category")?
            .unwrap_or(DEFAULT_CATEGORY)
            .to_owned())
    }

    fn primary_pattern(&self) -> Result<Pattern, ConfigurationError> {
        match self.get("pattern") {
            Some(Value::String(s)) if !s.is_empty() => self.pattern("pattern", s),
            Some(Value::String(_)) => Err(self.invalid("pattern", "must not be empty")),
            Some(other) => Err(self.invalid(
                "pattern",
                format!("expected a string, got {}", type_name(other)),
            )),
            None => Err(self.invalid("pattern", "missing")),
        }
    }

    fn pattern(&self, field: &'static str, source: &str) -> Result<Pattern, ConfigurationError> {
        Pattern::compile(source).map_err(|e| ConfigurationError::InvalidPattern {
            rule: format!("{} ({field})", self.id),
            pattern: source.to_owned(),
            reason: e.to_string(),
        })
    }

    fn weight(&self, kind: RuleKind) -> Result<f64, ConfigurationError> {
        let weight = match self.get("weight") {
            None => return Ok(kind.default_weight()),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(other) => {
                return Err(self.invalid(
                    "weight",
                    format!("expected a number, got {}", type_name(other)),
                ));
            }
        };
        match weight {
            Some(w) if w.is_finite() => Ok(w),
            _ => Err(self.invalid("weight", "expected a finite number")),
        }
    }

    fn action(&self) -> Result<GateAction, ConfigurationError> {
        match self.optional_str("action")? {
            None => Ok(GateAction::default()),
            Some(s) => s.parse().map_err(|reason: String| self.invalid("action", reason)),
        }
    }

    fn string_list(&self, field: &'static str) -> Result<Vec<&'a str>, ConfigurationError> {
        match self.get(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        self.invalid(
                            field,
                            format!("expected a list of strings, found {}", type_name(item)),
                        )
                    })
                })
                .collect(),
            Some(other) => Err(self.invalid(
                field,
                format!("expected a list of strings, got {}", type_name(other)),
            )),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}
