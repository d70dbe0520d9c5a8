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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let youtube_api_key = require("YOUTUBE_API_KEY")?;
    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("SENTINEL_ENV", "development"));

    let database_url = or_default("DATABASE_URL", "sqlite://sentinel.db");
    let bind_addr = parse_addr("SENTINEL_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("SENTINEL_LOG_LEVEL", "info");
    let gemini_model = or_default("SENTINEL_GEMINI_MODEL", "gemini-1.5-flash");

    let request_timeout_secs = parse_u64("SENTINEL_REQUEST_TIMEOUT_SECS", "60")?;
    let min_secs_between_calls = parse_f64("SENTINEL_MIN_SECS_BETWEEN_CALLS", "4.0")?;
    let inter_chunk_delay_secs = parse_u64("SENTINEL_INTER_CHUNK_DELAY_SECS", "30")?;
    let chunk_size = parse_usize("SENTINEL_CHUNK_SIZE", "10")?;
    let max_comments = parse_usize("SENTINEL_MAX_COMMENTS", "500")?;

    let db_max_connections = parse_u32("SENTINEL_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("SENTINEL_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if chunk_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SENTINEL_CHUNK_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        youtube_api_key,
        gemini_api_key,
        gemini_model,
        request_timeout_secs,
        min_secs_between_calls,
        inter_chunk_delay_secs,
        chunk_size,
        max_comments,
        db_max_connections,
        db_acquire_timeout_secs,
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
