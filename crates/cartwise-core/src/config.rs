use crate::app_config::{AppConfig, Environment};
use crate::location::UnitSystem;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("CARTWISE_ENV", "development"))?;
    let log_level = or_default("CARTWISE_LOG_LEVEL", "info");
    let model = or_default("CARTWISE_MODEL", "gemini-2.5-flash");
    let api_base_url = or_default(
        "CARTWISE_API_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let request_timeout_secs = parse_u64("CARTWISE_REQUEST_TIMEOUT_SECS", "60")?;

    // A zero gap would switch spacing off entirely.
    let parse_gap = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be greater than zero".to_string())),
            ms => Ok(ms),
        }
    };

    let generate_gap_ms = parse_gap("CARTWISE_GENERATE_GAP_MS", "1000")?;
    let search_gap_ms = parse_gap("CARTWISE_SEARCH_GAP_MS", "4000")?;
    let maps_gap_ms = parse_gap("CARTWISE_MAPS_GAP_MS", "2000")?;
    let max_retries = parse_u32("CARTWISE_MAX_RETRIES", "2")?;
    let search_max_retries = parse_u32("CARTWISE_SEARCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("CARTWISE_RETRY_BACKOFF_BASE_MS", "2000")?;
    let rate_limit_retry_delay_ms = parse_u64("CARTWISE_RATE_LIMIT_RETRY_DELAY_MS", "12000")?;

    let currency_symbol = or_default("CARTWISE_CURRENCY_SYMBOL", "£");
    let distance_unit = or_default("CARTWISE_DISTANCE_UNIT", "metric")
        .parse::<UnitSystem>()
        .map_err(|e| invalid("CARTWISE_DISTANCE_UNIT", e))?;
    let max_distance = or_default("CARTWISE_MAX_DISTANCE", "5")
        .parse::<f64>()
        .map_err(|e| invalid("CARTWISE_MAX_DISTANCE", e.to_string()))?;
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(invalid(
            "CARTWISE_MAX_DISTANCE",
            format!("must be a positive number, got {max_distance}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        gemini_api_key,
        model,
        api_base_url,
        request_timeout_secs,
        generate_gap_ms,
        search_gap_ms,
        maps_gap_ms,
        max_retries,
        search_max_retries,
        retry_backoff_base_ms,
        rate_limit_retry_delay_ms,
        currency_symbol,
        distance_unit,
        max_distance,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARTWISE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
