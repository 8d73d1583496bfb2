use crate::location::{Settings, UnitSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub gemini_api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub generate_gap_ms: u64,
    pub search_gap_ms: u64,
    pub maps_gap_ms: u64,
    pub max_retries: u32,
    pub search_max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub rate_limit_retry_delay_ms: u64,
    pub currency_symbol: String,
    pub distance_unit: UnitSystem,
    pub max_distance: f64,
}

impl AppConfig {
    /// Settings seeded from the configured defaults, with no location yet.
    #[must_use]
    pub fn default_settings(&self) -> Settings {
        Settings {
            currency_symbol: self.currency_symbol.clone(),
            distance_unit: self.distance_unit,
            max_distance: self.max_distance,
            ..Settings::default()
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("gemini_api_key", &"[redacted]")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("generate_gap_ms", &self.generate_gap_ms)
            .field("search_gap_ms", &self.search_gap_ms)
            .field("maps_gap_ms", &self.maps_gap_ms)
            .field("max_retries", &self.max_retries)
            .field("search_max_retries", &self.search_max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("rate_limit_retry_delay_ms", &self.rate_limit_retry_delay_ms)
            .field("currency_symbol", &self.currency_symbol)
            .field("distance_unit", &self.distance_unit)
            .field("max_distance", &self.max_distance)
            .finish()
    }
}
