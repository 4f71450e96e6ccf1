use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser user agent used for product page fetches unless overridden.
/// Brand storefronts serve stripped-down markup to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("SNEAKDB_ENV", "development"))?;
    let log_level = or_default("SNEAKDB_LOG_LEVEL", "info");

    let max_price = or_default("SNEAKDB_MAX_PRICE", "100000")
        .parse::<Decimal>()
        .map_err(|e| invalid("SNEAKDB_MAX_PRICE", e.to_string()))?;
    if max_price <= Decimal::ZERO {
        return Err(invalid(
            "SNEAKDB_MAX_PRICE",
            "must be greater than zero".to_string(),
        ));
    }

    let max_images = parse_usize("SNEAKDB_MAX_IMAGES", "64")?;
    let parallel_fields = parse_bool("SNEAKDB_PARALLEL_FIELDS", "false")?;
    let fetch_timeout_secs = parse_u64("SNEAKDB_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("SNEAKDB_FETCH_USER_AGENT", DEFAULT_USER_AGENT);
    let max_concurrent_pages = parse_usize("SNEAKDB_MAX_CONCURRENT_PAGES", "2")?;

    Ok(AppConfig {
        env,
        log_level,
        max_price,
        max_images,
        parallel_fields,
        fetch_timeout_secs,
        fetch_user_agent,
        max_concurrent_pages,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SNEAKDB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
