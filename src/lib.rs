//! Data provisioning for the rural producer registry.
//!
//! Two pieces run at startup, in this order:
//! - [`migrations::MigrationRunner`] applies the schema history exactly once
//! - [`seed::SeedOrchestrator`] fills an empty store with a reference dataset
//!   (municipalities from the IBGE catalog, then synthetic producers, farms,
//!   harvests and crop assignments)
//!
//! [`provision::provision`] wires both together from a [`config::ProvisionConfig`].

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod provision;
pub mod sampling;
pub mod seed;
pub mod store;

pub use config::ProvisionConfig;
pub use error::ProvisionError;
pub use migrations::{MigrationRunner, SchemaChange, SCHEMA_HISTORY};
pub use seed::{SeedConfig, SeedOrchestrator, SeedProfile, SeedRun, SeedScale};
