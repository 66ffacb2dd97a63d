use serde::{Deserialize, Serialize};

use crate::decision::DecisionKind;

/// Tally of a batch run, reported even when individual items failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Items read from the source, including undecodable ones.
    pub read: usize,
    /// Items rejected by the intake filter before scoring.
    pub discarded: usize,
    /// Items skipped because of an isolated per-item error.
    pub skipped: usize,
    pub marked: usize,
    pub acquitted: usize,
    pub deferred: usize,
    pub allowed: usize,
    pub flagged: usize,
    pub blocked: usize,
}

impl RunSummary {
    /// Count one decided item.
    pub fn record(&mut self, kind: DecisionKind) {
        let slot = match kind {
            DecisionKind::Mark => &mut self.marked,
            DecisionKind::Acquit => &mut self.acquitted,
            DecisionKind::Defer => &mut self.deferred,
            DecisionKind::Allow => &mut self.allowed,
            DecisionKind::Flag => &mut self.flagged,
            DecisionKind::Block => &mut self.blocked,
        };
        *slot += 1;
    }

    /// Number of items that reached a decision.
    #[must_use]
    pub fn decided(&self) -> usize {
        self.marked + self.acquitted + self.deferred + self.allowed + self.flagged + self.blocked
    }
}
