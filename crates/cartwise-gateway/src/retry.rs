//! Failure classification and back-off for the quota gateway.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};

use crate::error::BackendFailure;

/// Phrases in a 429 message that mean the daily allowance is gone rather
/// than a short burst limit.
const DAILY_QUOTA_SIGNALS: &[&str] = &["daily", "per day", "perday"];

const MAX_BACKOFF_MS: u64 = 60_000;

/// How the gateway should treat one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    /// 5xx or no status at all: retry with back-off.
    Transient,
    /// 429 without a daily-quota signal: one delayed retry.
    RateLimited,
    /// 429 whose message names the daily quota: never retried.
    DailyQuota,
    /// 401 / 403: configuration problem, never retried.
    Auth,
    /// Anything else: surfaced with the backend's message.
    Other,
}

pub(crate) fn classify(failure: &BackendFailure) -> FailureKind {
    match failure.status {
        None => FailureKind::Transient,
        Some(status) if (500..600).contains(&status) => FailureKind::Transient,
        Some(429) => {
            if mentions_daily_quota(&failure.message) {
                FailureKind::DailyQuota
            } else {
                FailureKind::RateLimited
            }
        }
        Some(401 | 403) => FailureKind::Auth,
        Some(_) => FailureKind::Other,
    }
}

fn mentions_daily_quota(message: &str) -> bool {
    let lower = message.to_lowercase();
    DAILY_QUOTA_SIGNALS.iter().any(|s| lower.contains(s))
}

/// Delay before the `retry`-th transient retry (1-based): `base * 2^(retry-1)`,
/// capped at 60 s, with ±25 % jitter.
pub(crate) fn backoff_delay(base: Duration, retry: u32) -> Duration {
    #[allow(clippy::cast_possible_truncation)]
    let base_ms = base.as_millis() as u64;
    let computed = base_ms.saturating_mul(1u64 << retry.saturating_sub(1).min(10));
    let capped = computed.min(MAX_BACKOFF_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(jittered)
}

/// When a daily quota resets: the next UTC midnight.
pub(crate) fn next_quota_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}
