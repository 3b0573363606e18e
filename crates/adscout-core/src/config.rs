use crate::app_config::{AppConfig, Environment, DEFAULT_API_BASE_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed or
/// violates a range constraint.
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
/// Returns `ConfigError` if a value is present but cannot be parsed or
/// violates a range constraint.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Kept free of `std::env` so tests can drive it with a plain `HashMap`.
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("ADSCOUT_ENV", "development"))?;
    let log_level = or_default("ADSCOUT_LOG_LEVEL", "info");
    let api_base_url = or_default("ADSCOUT_API_BASE_URL", DEFAULT_API_BASE_URL);

    let request_timeout_secs = parse_u64("ADSCOUT_REQUEST_TIMEOUT_SECS", "15")?;
    let pacing_min_ms = parse_u64("ADSCOUT_PACING_MIN_MS", "1500")?;
    let pacing_max_ms = parse_u64("ADSCOUT_PACING_MAX_MS", "3500")?;
    ensure_ordered("ADSCOUT_PACING_MAX_MS", pacing_min_ms, pacing_max_ms)?;

    let dynamic_pacing_min_ms = parse_u64("ADSCOUT_DYNAMIC_PACING_MIN_MS", "2000")?;
    let dynamic_pacing_max_ms = parse_u64("ADSCOUT_DYNAMIC_PACING_MAX_MS", "4000")?;
    ensure_ordered(
        "ADSCOUT_DYNAMIC_PACING_MAX_MS",
        dynamic_pacing_min_ms,
        dynamic_pacing_max_ms,
    )?;

    let max_consecutive_failures = parse_u32("ADSCOUT_MAX_CONSECUTIVE_FAILURES", "3")?;
    if max_consecutive_failures == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADSCOUT_MAX_CONSECUTIVE_FAILURES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let dynamic_sessions = parse_usize("ADSCOUT_DYNAMIC_SESSIONS", "3")?;
    if dynamic_sessions == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADSCOUT_DYNAMIC_SESSIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let output_dir = PathBuf::from(or_default("ADSCOUT_OUTPUT_DIR", "."));
    let hn_url = or_default("ADSCOUT_HN_URL", "https://news.ycombinator.com");
    let page_timeout_secs = parse_u64("ADSCOUT_PAGE_TIMEOUT_SECS", "10")?;
    let google_api_key = lookup("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
    let llm_model = or_default("ADSCOUT_LLM_MODEL", "gemini-1.5-flash");
    let llm_base_url = or_default(
        "ADSCOUT_LLM_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        pacing_min_ms,
        pacing_max_ms,
        dynamic_pacing_min_ms,
        dynamic_pacing_max_ms,
        max_consecutive_failures,
        dynamic_sessions,
        output_dir,
        hn_url,
        page_timeout_secs,
        google_api_key,
        llm_model,
        llm_base_url,
    })
}

fn ensure_ordered(max_var: &str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidEnvVar {
            var: max_var.to_string(),
            reason: format!("maximum {max} is below minimum {min}"),
        });
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADSCOUT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
