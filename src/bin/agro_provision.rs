//! Provisioning CLI
//!
//! Runs the startup sequence or one piece of it against the configured
//! SQLite database. Configuration comes from the environment (and `.env`).
//!
//! Usage:
//!   cargo run --bin agro_provision -- run
//!   cargo run --bin agro_provision -- status
//!   cargo run --bin agro_provision -- seed --scale medium --random-seed 42
//!   cargo run --bin agro_provision -- revert 20240115090300_create_harvests

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use agro_provision::database::DatabaseManager;
use agro_provision::provision::{orchestrator, provision_with};
use agro_provision::seed::SeedRun;
use agro_provision::{ProvisionConfig, SeedScale};

/// Schema migrations and reference-data seeding
#[derive(Parser, Debug)]
#[command(name = "agro_provision")]
#[command(about = "Provision the rural producer registry database")]
struct Cli {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Startup sequence: migrate if enabled, then seed if enabled
    Run,

    /// Apply pending schema changes
    Migrate,

    /// Show every schema change and when it was applied
    Status,

    /// Revert one applied schema change
    Revert {
        /// Schema change name, e.g. 20240115090300_create_harvests
        name: String,
    },

    /// Revert every applied schema change, newest first
    Reset,

    /// Seed reference data regardless of SEED_ENABLED
    Seed {
        /// Dataset size: small, medium, large
        #[arg(long)]
        scale: Option<SeedScale>,

        /// Fixed random seed for a reproducible dataset
        #[arg(long)]
        random_seed: Option<u64>,

        /// Last harvest year (defaults to the current year)
        #[arg(long)]
        reference_year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agro_provision=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ProvisionConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database.database_url = url;
    }

    let db = DatabaseManager::new(config.database.clone())
        .await
        .context("Failed to open database")?;

    let outcome = execute(cli.command, &db, config).await;
    db.close().await;
    outcome
}

async fn execute(
    command: Commands,
    db: &DatabaseManager,
    mut config: ProvisionConfig,
) -> Result<()> {
    match command {
        Commands::Run => {
            let summary = provision_with(db, &config)
                .await
                .context("Provisioning failed")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Migrate => {
            let report = db
                .migration_runner()
                .apply()
                .await
                .context("Migration failed")?;
            if report.applied.is_empty() {
                println!("Schema is up to date");
            }
            for name in &report.applied {
                println!("applied  {}", name);
            }
        }

        Commands::Status => {
            let status = db
                .migration_runner()
                .status()
                .await
                .context("Failed to read migration ledger")?;
            for entry in status {
                match entry.applied_at {
                    Some(at) => println!("{}  applied {}", entry.name, at.to_rfc3339()),
                    None => println!("{}  pending", entry.name),
                }
            }
        }

        Commands::Revert { name } => {
            db.migration_runner()
                .revert(&name)
                .await
                .with_context(|| format!("Failed to revert {}", name))?;
            println!("reverted {}", name);
        }

        Commands::Reset => {
            let reverted = db
                .migration_runner()
                .revert_all()
                .await
                .context("Failed to reset schema")?;
            for name in &reverted {
                println!("reverted {}", name);
            }
        }

        Commands::Seed {
            scale,
            random_seed,
            reference_year,
        } => {
            let mut seed = config.seed.clone();
            seed.enabled = true;
            if let Some(scale) = scale {
                seed.profile = scale.profile();
            }
            if reference_year.is_some() {
                seed.reference_year = reference_year;
            }
            if random_seed.is_some() {
                config.random_seed = random_seed;
            }

            let run = orchestrator(db, &config, seed)?
                .run()
                .await
                .context("Seeding failed")?;
            if let SeedRun::StoreNotReady = run {
                println!("Schema not ready; run `agro_provision migrate` first");
            }
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
    }

    Ok(())
}
