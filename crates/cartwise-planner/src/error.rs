use cartwise_core::CoreError;
use cartwise_sourcing::SourcingError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("lookup failed: {0}")]
    Sourcing(#[from] SourcingError),
}
