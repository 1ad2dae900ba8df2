//! Startup sequence: storage, schema, then reference data.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::catalog::IbgeCatalogClient;
use crate::config::ProvisionConfig;
use crate::database::DatabaseManager;
use crate::error::ProvisionError;
use crate::migrations::MigrationReport;
use crate::sampling::{SeededValues, ValueProvider};
use crate::seed::{SeedConfig, SeedOrchestrator, SeedRun};

/// What one startup did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionSummary {
    /// `None` when migrations are switched off
    pub migrations: Option<MigrationReport>,
    pub seed: SeedRun,
}

/// Random source for a run: fixed seed when configured, entropy otherwise.
pub fn value_provider(random_seed: Option<u64>) -> Box<dyn ValueProvider> {
    match random_seed {
        Some(seed) => {
            info!("Using fixed random seed {}", seed);
            Box::new(SeededValues::from_seed(seed))
        }
        None => Box::new(SeededValues::from_entropy()),
    }
}

/// Seed orchestrator over `db`, the IBGE catalog and the configured random source.
pub fn orchestrator(
    db: &DatabaseManager,
    config: &ProvisionConfig,
    seed: SeedConfig,
) -> Result<SeedOrchestrator, ProvisionError> {
    let catalog = IbgeCatalogClient::new(&config.catalog)?;
    Ok(SeedOrchestrator::new(
        seed,
        Arc::new(db.seed_store()),
        Arc::new(catalog),
        value_provider(config.random_seed),
    ))
}

/// Run the whole startup sequence against an open database.
///
/// Migrations complete before seeding starts; a migration failure stops the
/// sequence before any seeding.
pub async fn provision_with(
    db: &DatabaseManager,
    config: &ProvisionConfig,
) -> Result<ProvisionSummary, ProvisionError> {
    let migrations = if config.run_migrations {
        let report = db.migration_runner().apply().await?;
        info!("Schema up to date ({} applied)", report.applied_count());
        Some(report)
    } else {
        info!("Migrations disabled; skipping");
        None
    };

    let seed = orchestrator(db, config, config.seed.clone())?.run().await?;

    Ok(ProvisionSummary { migrations, seed })
}

/// Open the configured database and run the startup sequence.
pub async fn provision(config: &ProvisionConfig) -> Result<ProvisionSummary, ProvisionError> {
    let db = DatabaseManager::new(config.database.clone()).await?;
    let summary = provision_with(&db, config).await;
    db.close().await;
    summary
}
