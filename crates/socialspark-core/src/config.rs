use crate::app_config::{AppConfig, Environment};
use crate::content::Language;
use crate::ConfigError;

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = or_default("SOCIALSPARK_API_URL", "http://localhost:8000");
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SOCIALSPARK_API_URL".to_string(),
            reason: format!("'{api_url}' must start with http:// or https://"),
        });
    }

    let env = parse_environment(&or_default("SOCIALSPARK_ENV", "development"))?;
    let log_level = or_default("SOCIALSPARK_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("SOCIALSPARK_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("SOCIALSPARK_USER_AGENT", "socialspark/0.1 (content-studio)");
    let max_retries = parse_u32("SOCIALSPARK_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("SOCIALSPARK_RETRY_BACKOFF_BASE_MS", "500")?;

    let poll_interval_ms = parse_u64("SOCIALSPARK_POLL_INTERVAL_MS", "2000")?;
    let poll_max_interval_ms = parse_u64("SOCIALSPARK_POLL_MAX_INTERVAL_MS", "15000")?;
    if poll_interval_ms == 0 || poll_max_interval_ms < poll_interval_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "SOCIALSPARK_POLL_MAX_INTERVAL_MS".to_string(),
            reason: format!(
                "poll interval {poll_interval_ms}ms must be non-zero and not exceed max {poll_max_interval_ms}ms"
            ),
        });
    }
    let poll_deadline_secs = match parse_u64("SOCIALSPARK_POLL_DEADLINE_SECS", "900")? {
        0 => None,
        secs => Some(secs),
    };

    let store_path = PathBuf::from(or_default(
        "SOCIALSPARK_STORE_PATH",
        "./socialspark-drafts.json",
    ));
    let database_url = lookup("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());
    let brands_path = PathBuf::from(or_default(
        "SOCIALSPARK_BRANDS_PATH",
        "./config/brands.yaml",
    ));

    let raw_language = or_default("SOCIALSPARK_DEFAULT_LANGUAGE", "en");
    let default_language =
        raw_language
            .parse::<Language>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "SOCIALSPARK_DEFAULT_LANGUAGE".to_string(),
                reason: e.to_string(),
            })?;

    Ok(AppConfig {
        api_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        poll_interval_ms,
        poll_max_interval_ms,
        poll_deadline_secs,
        store_path,
        database_url,
        brands_path,
        default_language,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SOCIALSPARK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
