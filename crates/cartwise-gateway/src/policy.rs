//! Call classes and their admission/retry budgets.

use std::time::Duration;

use cartwise_core::AppConfig;

/// What kind of backend capability a call uses. Search-grounded calls are
/// the most quota-sensitive and get the widest spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallClass {
    /// Plain text/JSON generation.
    Generate,
    /// Generation grounded on live web search.
    WebSearch,
    /// Generation grounded on map data.
    Maps,
}

impl std::fmt::Display for CallClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallClass::Generate => write!(f, "generate"),
            CallClass::WebSearch => write!(f, "web_search"),
            CallClass::Maps => write!(f, "maps"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassPolicy {
    /// Minimum quiet time after a call of this class is admitted.
    pub gap: Duration,
    /// Retries allowed for transient (5xx / network) failures.
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub generate: ClassPolicy,
    pub web_search: ClassPolicy,
    pub maps: ClassPolicy,
    /// Base delay for transient retries: `base * 2^(n-1)`, jittered.
    pub backoff_base: Duration,
    /// Fixed delay before the single retry of a non-daily 429.
    pub rate_limit_retry_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            generate: ClassPolicy {
                gap: Duration::from_millis(1_000),
                max_retries: 2,
            },
            web_search: ClassPolicy {
                gap: Duration::from_millis(4_000),
                max_retries: 3,
            },
            maps: ClassPolicy {
                gap: Duration::from_millis(2_000),
                max_retries: 2,
            },
            backoff_base: Duration::from_millis(2_000),
            rate_limit_retry_delay: Duration::from_millis(12_000),
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            generate: ClassPolicy {
                gap: Duration::from_millis(config.generate_gap_ms),
                max_retries: config.max_retries,
            },
            web_search: ClassPolicy {
                gap: Duration::from_millis(config.search_gap_ms),
                max_retries: config.search_max_retries,
            },
            maps: ClassPolicy {
                gap: Duration::from_millis(config.maps_gap_ms),
                max_retries: config.max_retries,
            },
            backoff_base: Duration::from_millis(config.retry_backoff_base_ms),
            rate_limit_retry_delay: Duration::from_millis(config.rate_limit_retry_delay_ms),
        }
    }

    /// No spacing and no delays, same retry budgets. For tests and dry runs.
    #[must_use]
    pub fn immediate() -> Self {
        let defaults = Self::default();
        Self {
            generate: ClassPolicy {
                gap: Duration::ZERO,
                ..defaults.generate
            },
            web_search: ClassPolicy {
                gap: Duration::ZERO,
                ..defaults.web_search
            },
            maps: ClassPolicy {
                gap: Duration::ZERO,
                ..defaults.maps
            },
            backoff_base: Duration::ZERO,
            rate_limit_retry_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn policy(&self, class: CallClass) -> ClassPolicy {
        match class {
            CallClass::Generate => self.generate,
            CallClass::WebSearch => self.web_search,
            CallClass::Maps => self.maps,
        }
    }
}
