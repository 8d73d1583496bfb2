use chrono::{DateTime, Utc};
use thiserror::Error;

/// A single failed backend call, as reported by the transport.
///
/// `status` is `None` for network-level failures (connect, timeout, reset).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl BackendFailure {
    #[must_use]
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Classified outcome of a gateway call that did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Server-side or network failure that persisted through every retry.
    #[error("backend unavailable after {attempts} attempts: {message}")]
    Unavailable {
        status: Option<u16>,
        message: String,
        attempts: u32,
    },

    /// Short-lived rate limit (HTTP 429) that survived one delayed retry.
    #[error("rate limited by the backend; wait about 60 seconds and try again")]
    RateLimited { message: String },

    /// The daily quota is spent. Never retried.
    #[error("daily quota exhausted; try again after {resets_at}")]
    DailyQuotaExhausted {
        message: String,
        resets_at: DateTime<Utc>,
    },

    /// HTTP 401/403: the credential is missing, invalid, or lacks access.
    #[error("backend rejected the credential (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// Any other non-success status, surfaced with the backend's message.
    #[error("backend error (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl GatewayError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Unavailable { status, .. } => *status,
            GatewayError::RateLimited { .. } | GatewayError::DailyQuotaExhausted { .. } => {
                Some(429)
            }
            GatewayError::Auth { status, .. } | GatewayError::Rejected { status, .. } => {
                Some(*status)
            }
        }
    }

    /// The backend-provided message behind this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Unavailable { message, .. }
            | GatewayError::RateLimited { message }
            | GatewayError::DailyQuotaExhausted { message, .. }
            | GatewayError::Auth { message, .. }
            | GatewayError::Rejected { message, .. } => message,
        }
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited { .. } | GatewayError::DailyQuotaExhausted { .. }
        )
    }

    #[must_use]
    pub fn is_daily_exhausted(&self) -> bool {
        matches!(self, GatewayError::DailyQuotaExhausted { .. })
    }

    /// Whether offering the end user a "retry" action makes sense.
    #[must_use]
    pub fn is_user_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Unavailable { .. } | GatewayError::RateLimited { .. }
        )
    }
}

/// Errors constructing a backend client.
#[derive(Debug, Error)]
pub enum BackendSetupError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
