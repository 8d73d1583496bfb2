//! Item resolution, price sourcing, and branch location on top of the
//! quota gateway.
//!
//! Each call site has its own parsing boundary that turns loosely formatted
//! model output into a typed value; malformed text degrades to an empty or
//! default result and never escapes as an error.

pub mod assistant;
pub mod branch;
pub mod error;
pub mod geocode;
pub mod pricing;
pub mod resolver;

mod extract;
mod prompts;

use std::future::Future;

use cartwise_core::{Location, PriceQuote, UnitSystem};
use rust_decimal::Decimal;

pub use assistant::Assistant;
pub use branch::{parse_distance, BranchInfo, NEARBY_PLACEHOLDER};
pub use error::SourcingError;
pub use pricing::MAX_OPTIONS;
pub use resolver::Resolution;

/// The external lookups the planner depends on.
///
/// [`Assistant`] is the production implementation; every method goes through
/// the quota gateway.
pub trait Sourcing: Send + Sync {
    /// Interprets free text as a canonical item, flagging ambiguous names.
    fn resolve(
        &self,
        raw: &str,
    ) -> impl Future<Output = Result<Resolution, SourcingError>> + Send;

    /// Up to [`MAX_OPTIONS`] quotes near `location`, cheapest first.
    /// Unparsable responses yield an empty list.
    fn find_top_options(
        &self,
        name: &str,
        location: Option<&Location>,
        currency: &str,
    ) -> impl Future<Output = Result<Vec<PriceQuote>, SourcingError>> + Send;

    /// The price of `name` at `shop`. Zero means "unknown", never "free".
    fn price_at(
        &self,
        name: &str,
        shop: &str,
        location: Option<&Location>,
        currency: &str,
    ) -> impl Future<Output = Result<Decimal, SourcingError>> + Send;

    /// Nearest branch of `shop` to `location`, with its distance.
    fn locate_branch(
        &self,
        shop: &str,
        location: &Location,
        unit: UnitSystem,
    ) -> impl Future<Output = Result<BranchInfo, SourcingError>> + Send;

    /// Coordinates for a user-entered place, if the backend can place it.
    fn geocode(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<Option<Location>, SourcingError>> + Send;
}
