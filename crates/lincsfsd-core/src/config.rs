use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub(crate) const DEFAULT_DETAIL_BASE_URL: &str = "https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = or_default("LINCSFSD_BIND_ADDR", "0.0.0.0:7071")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LINCSFSD_BIND_ADDR", e.to_string()))?;

    let request_timeout_secs = or_default("LINCSFSD_REQUEST_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("LINCSFSD_REQUEST_TIMEOUT_SECS", e.to_string()))?;

    let detail_concurrency = or_default("LINCSFSD_DETAIL_CONCURRENCY", "1")
        .parse::<usize>()
        .map_err(|e| invalid("LINCSFSD_DETAIL_CONCURRENCY", e.to_string()))?;
    if detail_concurrency == 0 {
        return Err(invalid(
            "LINCSFSD_DETAIL_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let detail_base_url = normalize_base_url(&or_default(
        "LINCSFSD_DETAIL_BASE_URL",
        DEFAULT_DETAIL_BASE_URL,
    ))
    .ok_or_else(|| {
        invalid(
            "LINCSFSD_DETAIL_BASE_URL",
            "must be an absolute http(s) URL".to_string(),
        )
    })?;

    let env = parse_environment(&or_default("LINCSFSD_ENV", "development"));
    let log_level = or_default("LINCSFSD_LOG_LEVEL", "info");
    let user_agent = or_default("LINCSFSD_USER_AGENT", "lincsfsd/0.1 (directory-search)");
    let raw_html_log_path = lookup("LINCSFSD_RAW_HTML_LOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        detail_base_url,
        detail_concurrency,
        raw_html_log_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Ensures the base ends with exactly one slash so relative links join onto
/// the directory rather than replacing its last path segment.
fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))?;
    if rest.trim_matches('/').is_empty() {
        return None;
    }
    Some(format!("{}/", trimmed.trim_end_matches('/')))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
