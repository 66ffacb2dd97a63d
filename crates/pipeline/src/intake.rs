use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How `include` patterns combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// At least one include pattern must match.
    #[default]
    Any,
    /// Every include pattern must match.
    All,
}

/// A declarative discard condition, checked before keyword matching.
///
/// Lengths count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardRule {
    /// Discard texts shorter than this.
    MinLength(usize),
    /// Discard texts longer than this.
    MaxLength(usize),
    /// Discard texts matching this pattern.
    MatchesPattern(String),
    /// Discard texts that do not match this pattern.
    LacksPattern(String),
}

/// An intake pattern failed to compile.
#[derive(Debug, Error)]
#[error("configuration error: intake.{field}: invalid pattern {pattern:?}: {source}")]
pub struct IntakeError {
    pub field: &'static str,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Outcome of running one text through the [`IntakeFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Passed; `keywords_hit` lists the include patterns that matched.
    Kept { keywords_hit: Vec<String> },
    /// Rejected before scoring.
    Discarded { reason: String },
}

#[derive(Debug, Clone)]
enum Discard {
    MinLength(usize),
    MaxLength(usize),
    Matches(Regex),
    Lacks(Regex),
}

impl Discard {
    fn compile(rule: &DiscardRule) -> Result<Self, IntakeError> {
        Ok(match rule {
            DiscardRule::MinLength(n) => Self::MinLength(*n),
            DiscardRule::MaxLength(n) => Self::MaxLength(*n),
            DiscardRule::MatchesPattern(p) => Self::Matches(compile("discard", p)?),
            DiscardRule::LacksPattern(p) => Self::Lacks(compile("discard", p)?),
        })
    }

    fn reason(&self, text: &str) -> Option<String> {
        match self {
            Self::MinLength(n) => {
                let len = text.chars().count();
                (len < *n).then(|| format!("length {len} is below minimum {n}"))
            }
            Self::MaxLength(n) => {
                let len = text.chars().count();
                (len > *n).then(|| format!("length {len} exceeds maximum {n}"))
            }
            Self::Matches(re) => re
                .is_match(text)
                .then(|| format!("matches discard pattern {:?}", re.as_str())),
            Self::Lacks(re) => (!re.is_match(text))
                .then(|| format!("lacks required pattern {:?}", re.as_str())),
        }
    }
}

/// Keyword gate applied to items before they reach a classifier.
///
/// Patterns are used exactly as written; prefix them with `(?i)` for
/// case-insensitive matching. An empty include list admits every text that
/// survives the discard and exclude checks.
#[derive(Debug, Clone, Default)]
pub struct IntakeFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    policy: MatchPolicy,
    discard: Vec<Discard>,
}

impl IntakeFilter {
    /// Build a filter from include and exclude pattern lists.
    pub fn new(
        include: &[String],
        exclude: &[String],
        policy: MatchPolicy,
    ) -> Result<Self, IntakeError> {
        Ok(Self {
            include: compile_all("include", include)?,
            exclude: compile_all("exclude", exclude)?,
            policy,
            discard: Vec::new(),
        })
    }

    /// Add discard conditions, checked in order before any keyword matching.
    pub fn with_discard(mut self, rules: &[DiscardRule]) -> Result<Self, IntakeError> {
        for rule in rules {
            self.discard.push(Discard::compile(rule)?);
        }
        Ok(self)
    }

    /// Whether the filter lets every text through.
    pub fn is_pass_through(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.discard.is_empty()
    }

    /// Decide whether `text` should be scored.
    pub fn admit(&self, text: &str) -> Admission {
        if let Some(reason) = self.discard.iter().find_map(|d| d.reason(text)) {
            return Admission::Discarded { reason };
        }

        if let Some(re) = self.exclude.iter().find(|re| re.is_match(text)) {
            return Admission::Discarded {
                reason: format!("matches exclude pattern {:?}", re.as_str()),
            };
        }

        let keywords_hit: Vec<String> = self
            .include
            .iter()
            .filter(|re| re.is_match(text))
            .map(|re| re.as_str().to_owned())
            .collect();

        let included = match self.policy {
            _ if self.include.is_empty() => true,
            MatchPolicy::Any => !keywords_hit.is_empty(),
            MatchPolicy::All => keywords_hit.len() == self.include.len(),
        };

        if included {
            Admission::Kept { keywords_hit }
        } else {
            Admission::Discarded {
                reason: match self.policy {
                    MatchPolicy::Any => "no include pattern matched".to_owned(),
                    MatchPolicy::All => format!(
                        "{} of {} include patterns matched",
                        keywords_hit.len(),
                        self.include.len()
                    ),
                },
            }
        }
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, IntakeError> {
    Regex::new(pattern).map_err(|source| IntakeError {
        field,
        pattern: pattern.to_owned(),
        source,
    })
}

fn compile_all(field: &'static str, patterns: &[String]) -> Result<Vec<Regex>, IntakeError> {
    patterns.iter().map(|p| compile(field, p)).collect()
}
