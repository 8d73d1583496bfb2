//! Shopping list state, the item pipeline, and whole-trip strategy ranking.

pub mod cache;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod list;
pub mod planner;

#[cfg(test)]
pub(crate) mod fake;

pub use cache::ResultCache;
pub use engine::{rank_strategies, RankingContext, RankingOptions};
pub use error::PlanError;
pub use fingerprint::RankingFingerprint;
pub use list::ShoppingList;
pub use planner::Planner;
