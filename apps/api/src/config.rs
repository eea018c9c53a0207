use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// External vocabulary file; the built-in vocabulary is used when unset.
    pub vocabulary_path: Option<PathBuf>,
    /// Seed for the recommendation jitter. Unset means a fresh thread RNG.
    pub recommendation_seed: Option<u64>,
    pub recommendation_jitter_max: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            vocabulary_path: std::env::var("VOCABULARY_PATH").ok().map(PathBuf::from),
            recommendation_seed: optional_env("RECOMMENDATION_SEED")?,
            recommendation_jitter_max: validate_jitter_max(
                optional_env("RECOMMENDATION_JITTER_MAX")?
                    .unwrap_or(crate::matching::jitter::DEFAULT_JITTER_MAX),
            )
            .context("RECOMMENDATION_JITTER_MAX must be a finite, non-negative number")?,
        })
    }
}

/// NaN, infinities and negatives are rejected; the RNG cannot sample from them.
fn validate_jitter_max(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(anyhow!("got {value}"))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(None),
    }
}
