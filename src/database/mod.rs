//! Database connection and management module
//!
//! This module provides SQLite connection pooling and configuration, and
//! provisions the storage location (the database file's directory) before the
//! first connection is opened.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::ProvisionError;
use crate::migrations::{MigrationRunner, SCHEMA_HISTORY};
use crate::store::SqliteSeedStore;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/agro.db";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        is_memory_url(&self.database_url)
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// File path behind a SQLite URL, or `None` for in-memory databases.
///
/// Parsed by sqlx itself so the path matches the file the pool will open,
/// percent-decoding included.
pub fn storage_path(database_url: &str) -> Result<Option<PathBuf>, sqlx::Error> {
    if is_memory_url(database_url) {
        return Ok(None);
    }
    let options = SqliteConnectOptions::from_str(database_url)?;
    let path = options.get_filename();
    if path.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(path.to_path_buf()))
    }
}

/// Create the directory that will hold the database file.
///
/// Returns the directory when one had to be considered, `None` for in-memory
/// databases or files in the working directory.
pub async fn ensure_storage_location(
    database_url: &str,
) -> Result<Option<PathBuf>, ProvisionError> {
    let Some(path) = storage_path(database_url)? else {
        return Ok(None);
    };
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };
    if !Path::new(parent).exists() {
        info!("Creating storage directory {}", parent.display());
    }
    tokio::fs::create_dir_all(parent).await?;
    Ok(Some(parent.to_path_buf()))
}

/// Database connection manager
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// Create a new database manager with the given configuration.
    ///
    /// File databases get their directory created and the file created if
    /// missing. In-memory databases are pinned to one connection that never
    /// expires, since every SQLite memory connection is its own database.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ProvisionError> {
        ensure_storage_location(&config.database_url).await?;

        info!("Connecting to database: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.connection_timeout);
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(config.max_connections);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            warn!("Failed to connect to database: {}", e);
            e
        })?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Private in-memory database, mostly for tests and dry runs.
    pub async fn in_memory() -> Result<Self, ProvisionError> {
        Self::new(DatabaseConfig::in_memory()).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Migration runner over the shipped schema history.
    pub fn migration_runner(&self) -> MigrationRunner {
        MigrationRunner::new(self.pool.clone(), SCHEMA_HISTORY)
    }

    /// Persistence collaborator for the seeding pipeline.
    pub fn seed_store(&self) -> SqliteSeedStore {
        SqliteSeedStore::new(self.pool.clone())
    }

    /// Test database connectivity
    pub async fn test_connection(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
    }

    /// Close the database connection pool
    pub async fn close(self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}
