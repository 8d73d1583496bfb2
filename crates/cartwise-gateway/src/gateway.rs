//! The quota gateway: serialized admission plus classified retries.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::error::{BackendFailure, GatewayError};
use crate::lane::Lane;
use crate::policy::{CallClass, GatewayConfig};
use crate::retry::{backoff_delay, classify, next_quota_reset, FailureKind};

/// Serializes and retries every call to the quota-limited backend.
///
/// Share one instance (behind an `Arc`) between all callers: concurrent
/// `invoke`s queue on the same lane and are admitted first-come first-served,
/// each admission followed by the call class's minimum gap. Retry attempts
/// re-enter the lane like any other call.
#[derive(Debug)]
pub struct QuotaGateway {
    lane: Lane,
    config: GatewayConfig,
}

impl QuotaGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            lane: Lane::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs `operation` through the lane, retrying per the failure policy.
    ///
    /// | Failure | Behaviour |
    /// |---------|-----------|
    /// | 5xx / no status | retry up to the class's `max_retries`, exponential back-off |
    /// | 429, daily quota | no retry, [`GatewayError::DailyQuotaExhausted`] |
    /// | 429, other | one retry after `rate_limit_retry_delay`, then [`GatewayError::RateLimited`] |
    /// | 401 / 403 | no retry, [`GatewayError::Auth`] |
    /// | anything else | no retry, [`GatewayError::Rejected`] |
    ///
    /// # Errors
    ///
    /// Returns the classified [`GatewayError`] once the policy gives up.
    pub async fn invoke<T, F, Fut>(
        &self,
        class: CallClass,
        mut operation: F,
    ) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendFailure>>,
    {
        let policy = self.config.policy(class);
        let mut attempts = 0u32;
        let mut transient_retries = 0u32;
        let mut rate_limit_retried = false;

        loop {
            let waited = self.lane.admit(policy.gap).await;
            attempts += 1;
            tracing::debug!(
                %class,
                attempt = attempts,
                waited_ms = duration_ms(waited),
                "gateway admitted call"
            );

            let failure = match operation().await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            let delay = match classify(&failure) {
                FailureKind::Transient => {
                    if transient_retries >= policy.max_retries {
                        return Err(GatewayError::Unavailable {
                            status: failure.status,
                            message: failure.message,
                            attempts,
                        });
                    }
                    transient_retries += 1;
                    backoff_delay(self.config.backoff_base, transient_retries)
                }
                FailureKind::RateLimited => {
                    if rate_limit_retried {
                        return Err(GatewayError::RateLimited {
                            message: failure.message,
                        });
                    }
                    rate_limit_retried = true;
                    self.config.rate_limit_retry_delay
                }
                FailureKind::DailyQuota => {
                    return Err(GatewayError::DailyQuotaExhausted {
                        message: failure.message,
                        resets_at: next_quota_reset(Utc::now()),
                    });
                }
                FailureKind::Auth => {
                    return Err(GatewayError::Auth {
                        status: failure.status.unwrap_or_default(),
                        message: failure.message,
                    });
                }
                FailureKind::Other => {
                    return Err(GatewayError::Rejected {
                        status: failure.status.unwrap_or_default(),
                        message: failure.message,
                    });
                }
            };

            tracing::warn!(
                %class,
                attempt = attempts,
                status = ?failure.status,
                delay_ms = duration_ms(delay),
                error = %failure,
                "backend call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
