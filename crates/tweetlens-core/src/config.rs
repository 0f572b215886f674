use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is malformed or fails validation.
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
/// Returns `ConfigError` if a value is malformed or fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f32>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    };

    let env = parse_environment(&or_default("TWEETLENS_ENV", "development"))?;
    let bind_addr = parse_addr("TWEETLENS_BIND_ADDR", "127.0.0.1:8000")?;
    let log_level = or_default("TWEETLENS_LOG_LEVEL", "info");
    let data_path = optional_path("TWEETLENS_DATA_PATH");
    let lexicon_path = optional_path("TWEETLENS_LEXICON_PATH");

    let positive_threshold = parse_f32("TWEETLENS_POSITIVE_THRESHOLD", "0.05")?;
    let negative_threshold = parse_f32("TWEETLENS_NEGATIVE_THRESHOLD", "-0.05")?;
    let remove_stopwords = parse_bool("TWEETLENS_REMOVE_STOPWORDS", "true")?;
    let expand_acronyms = parse_bool("TWEETLENS_EXPAND_ACRONYMS", "true")?;
    let vector_dimensions = parse_usize("TWEETLENS_VECTOR_DIMENSIONS", "1024")?;
    let rate_limit_per_minute = parse_usize("TWEETLENS_RATE_LIMIT_PER_MINUTE", "120")?;

    if negative_threshold > positive_threshold {
        return Err(ConfigError::Validation(format!(
            "negative threshold {negative_threshold} must not exceed positive threshold {positive_threshold}"
        )));
    }
    if !(-1.0..=1.0).contains(&positive_threshold) || !(-1.0..=1.0).contains(&negative_threshold)
    {
        return Err(ConfigError::Validation(
            "sentiment thresholds must lie in [-1, 1]".to_string(),
        ));
    }
    if vector_dimensions == 0 {
        return Err(ConfigError::Validation(
            "TWEETLENS_VECTOR_DIMENSIONS must be greater than zero".to_string(),
        ));
    }
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::Validation(
            "TWEETLENS_RATE_LIMIT_PER_MINUTE must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_path,
        lexicon_path,
        positive_threshold,
        negative_threshold,
        remove_stopwords,
        expand_acronyms,
        vector_dimensions,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TWEETLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
