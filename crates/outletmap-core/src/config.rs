use crate::app_config::{AppConfig, BaseUrl};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any value is present but invalid.
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
/// Returns `ConfigError` if any value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), None)
}

/// Like [`load_app_config`], but with the backend origin already chosen
/// (e.g. from a command-line flag). `OUTLETMAP_API_BASE_URL` is not read.
///
/// # Errors
///
/// Returns `ConfigError` if any other value is present but invalid.
pub fn load_app_config_with_base_url(base_url: BaseUrl) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key), Some(base_url))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail. A given
/// `base_url` takes the place of `OUTLETMAP_API_BASE_URL`.
fn build_app_config<F>(lookup: F, base_url: Option<BaseUrl>) -> Result<AppConfig, ConfigError>
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
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = match base_url {
        Some(base_url) => base_url,
        None => {
            let var = "OUTLETMAP_API_BASE_URL";
            BaseUrl::parse(&or_default(var, "http://127.0.0.1:8000"))
                .map_err(|r| invalid(var, r))?
        }
    };

    let log_level = or_default("OUTLETMAP_LOG_LEVEL", "warn");

    let request_timeout_secs = parse_u64("OUTLETMAP_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "OUTLETMAP_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let user_agent = or_default("OUTLETMAP_USER_AGENT", "outletmap/0.1 (outlet-map-client)");

    let coverage_radius_m = {
        let var = "OUTLETMAP_COVERAGE_RADIUS_M";
        let raw = or_default(var, "5000");
        let radius = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(invalid(var, format!("'{raw}' is not a positive distance")));
        }
        radius
    };

    let trust_bot_html = {
        let var = "OUTLETMAP_TRUST_BOT_HTML";
        parse_bool(&or_default(var, "false")).ok_or_else(|| {
            invalid(var, "expected one of true/false/1/0/yes/no".to_string())
        })?
    };

    Ok(AppConfig {
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        coverage_radius_m,
        trust_bot_html,
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
