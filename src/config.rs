//! Provisioning configuration
//!
//! Built from key lookups so tests can feed a map; the binary uses
//! [`ProvisionConfig::from_env`] after loading `.env`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::catalog::CatalogConfig;
use crate::database::{DatabaseConfig, DEFAULT_DATABASE_URL};
use crate::seed::{SeedConfig, SeedScale, DEFAULT_REGION_DELAY};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid URL for {key}: '{value}' ({reason})")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub seed: SeedConfig,
    pub catalog: CatalogConfig,
    /// Fixed random seed; entropy when unset
    pub random_seed: Option<u64>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            run_migrations: true,
            seed: SeedConfig::default(),
            catalog: CatalogConfig::default(),
            random_seed: None,
        }
    }
}

impl ProvisionConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Missing or blank keys take
    /// their defaults; present but malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let database = DatabaseConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: pool_size(get("DATABASE_POOL_SIZE"))?,
            ..defaults.database
        };

        let scale = match get("SEED_SCALE") {
            Some(raw) => SeedScale::from_str(&raw).map_err(|_| ConfigError::InvalidValue {
                key: "SEED_SCALE",
                value: raw,
            })?,
            None => SeedScale::default(),
        };

        let delay_ms = parse_or(
            "SEED_REGION_DELAY_MS",
            get("SEED_REGION_DELAY_MS"),
            DEFAULT_REGION_DELAY.as_millis() as u64,
        )?;

        let seed = SeedConfig {
            enabled: flag("SEED_ENABLED", get("SEED_ENABLED"), false)?,
            profile: scale.profile(),
            region_delay: Duration::from_millis(delay_ms),
            reference_year: None,
        };

        let base_url = match get("CATALOG_BASE_URL") {
            Some(raw) => validate_url("CATALOG_BASE_URL", raw)?,
            None => defaults.catalog.base_url,
        };
        let timeout_secs = parse_or(
            "CATALOG_TIMEOUT_SECS",
            get("CATALOG_TIMEOUT_SECS"),
            defaults.catalog.timeout.as_secs(),
        )?;

        let random_seed = match get("SEED_RANDOM_SEED") {
            Some(raw) => Some(parse_or("SEED_RANDOM_SEED", Some(raw), 0)?),
            None => None,
        };

        Ok(Self {
            database,
            run_migrations: flag("RUN_MIGRATIONS", get("RUN_MIGRATIONS"), true)?,
            seed,
            catalog: CatalogConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            random_seed,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// Pool size must be at least one connection.
fn pool_size(raw: Option<String>) -> Result<u32, ConfigError> {
    let size = parse_or("DATABASE_POOL_SIZE", raw, 5)?;
    if size == 0 {
        return Err(ConfigError::InvalidValue {
            key: "DATABASE_POOL_SIZE",
            value: size.to_string(),
        });
    }
    Ok(size)
}

fn flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

fn validate_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        Ok(url) => Err(ConfigError::InvalidUrl {
            key,
            reason: format!("unsupported scheme '{}'", url.scheme()),
            value,
        }),
        Err(e) => Err(ConfigError::InvalidUrl {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
