//! Top-level error type for the provisioning startup sequence
//!
//! Each module owns its own error enum; this one aggregates them for callers
//! that drive the whole sequence (the binary, or an application's startup hook).

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::migrations::MigrationError;
use crate::seed::SeedError;

/// Anything that stops provisioning. All variants abort startup.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage location error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    #[error("Seeding error: {0}")]
    Seed(#[from] SeedError),

    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),
}
