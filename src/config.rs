use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::providers::pokeapi::DEFAULT_POKEAPI_URL;
use crate::providers::CacheSettings;

/// Runtime configuration
///
/// Every field can be overridden through the environment (see [`QuizConfig::from_env`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuizConfig {
    pub host: String,
    pub port: u16,
    /// SQLite path; `:memory:` for a throwaway leaderboard
    pub db_path: String,
    pub pokeapi_url: String,
    pub cache_ttl_secs: u64,
    pub cache_max_size: usize,
    pub http_timeout_secs: u64,
    pub fetch_concurrency: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            db_path: "pokequiz.db".to_string(),
            pokeapi_url: DEFAULT_POKEAPI_URL.to_string(),
            cache_ttl_secs: 24 * 60 * 60,
            cache_max_size: 1000,
            http_timeout_secs: 10,
            fetch_concurrency: 16,
        }
    }
}

impl QuizConfig {
    /// Load from process environment, after reading `.env` if present
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            db_path: lookup("DB_PATH").unwrap_or(defaults.db_path),
            pokeapi_url: lookup("POKEAPI_URL").unwrap_or(defaults.pokeapi_url),
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_max_size: parse_or(&lookup, "CACHE_MAX_SIZE", defaults.cache_max_size),
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            fetch_concurrency: parse_or(&lookup, "FETCH_CONCURRENCY", defaults.fetch_concurrency),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_settings(&self) -> CacheSettings {
        let ttl_secs = i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX);
        CacheSettings {
            ttl: chrono::Duration::try_seconds(ttl_secs).unwrap_or_else(|| chrono::Duration::days(36_500)),
            max_size: self.cache_max_size,
            fetch_concurrency: self.fetch_concurrency,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}
