pub mod decision;
pub mod error;
pub mod hit;
pub mod item;
pub mod summary;
pub mod types;

pub use decision::{Decision, DecisionKind, DecisionRecord, RawMatches, raw_matches_from_hits};
pub use error::ItemError;
pub use hit::{GateAction, MatchHit};
pub use item::Item;
pub use summary::RunSummary;
pub use types::{ItemId, RuleId};
