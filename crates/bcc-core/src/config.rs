use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let store_hash = require("BC_STORE_HASH")?;
    let access_token = require("BC_ACCESS_TOKEN")?;

    let api_base_url = or_default("BCC_API_BASE_URL", "https://api.bigcommerce.com");
    let env = parse_environment(&or_default("BCC_ENV", "development"))?;

    let bind_addr = or_default("BCC_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("BCC_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("BCC_LOG_LEVEL", "info");
    let public_dir = PathBuf::from(or_default("BCC_PUBLIC_DIR", "./public"));
    let export_dir = PathBuf::from(or_default("BCC_EXPORT_DIR", "./exports"));

    let request_timeout_secs = match lookup("BCC_REQUEST_TIMEOUT_SECS") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("BCC_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        _ => None,
    };

    let page_size = parse_u32("BCC_PAGE_SIZE", "250")?;
    if page_size == 0 {
        return Err(invalid("BCC_PAGE_SIZE", "must be at least 1".to_string()));
    }
    let page_delay_ms = parse_u64("BCC_PAGE_DELAY_MS", "50")?;
    let create_delay_ms = parse_u64("BCC_CREATE_DELAY_MS", "200")?;
    let max_batch = parse_u32("BCC_MAX_BATCH", "800")?;

    let conflict_markers = parse_markers(&or_default(
        "BCC_CONFLICT_MARKERS",
        "already exists,conflict",
    ));

    Ok(AppConfig {
        store_hash,
        access_token,
        api_base_url,
        env,
        bind_addr,
        log_level,
        public_dir,
        export_dir,
        request_timeout_secs,
        page_size,
        page_delay_ms,
        create_delay_ms,
        max_batch,
        conflict_markers,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BCC_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Splits a comma-separated marker list, dropping blanks.
fn parse_markers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
