use std::fmt;

use inquisitor_core::MatchHit;

/// Explains a gate decision from the draft text and the rules it tripped.
///
/// Implementations may call out to an external model; the core only ever
/// uses the injected instance and falls back to [`HeuristicSummarizer`].
pub trait Summarizer: Send + Sync + fmt::Debug {
    /// Summarize the hits for the given text.
    fn summarize(&self, text: &str, hits: &[MatchHit]) -> String;
}

/// Deterministic, offline summary: hit count plus a per-category tally in
/// first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSummarizer;

impl Summarizer for HeuristicSummarizer {
    fn summarize(&self, _text: &str, hits: &[MatchHit]) -> String {
        if hits.is_empty() {
            return "No policy checks triggered; content appears compliant under current rules."
                .to_owned();
        }

        let mut categories: Vec<(&str, usize)> = Vec::new();
        for hit in hits {
            let category = hit.category.as_deref().unwrap_or("general");
            match categories.iter_mut().find(|(name, _)| *name == category) {
                Some((_, count)) => *count += 1,
                None => categories.push((category, 1)),
            }
        }

        let tally = categories
            .iter()
            .map(|(name, count)| format!("{name}×{count}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} check(s) triggered. Categories: {tally}", hits.len())
    }
}
