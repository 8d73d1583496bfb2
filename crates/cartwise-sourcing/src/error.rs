use cartwise_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourcingError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl SourcingError {
    /// The underlying gateway error.
    #[must_use]
    pub fn gateway(&self) -> &GatewayError {
        match self {
            SourcingError::Gateway(e) => e,
        }
    }
}
