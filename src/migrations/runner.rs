//! Migration runner: applies pending schema changes in one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::{MigrationError, SchemaChange};

/// Ledger of applied schema changes.
pub const LEDGER_TABLE: &str = "schema_migrations";

/// Names applied by one `apply()` call, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub applied: Vec<String>,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// Per-change view of the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    pub name: String,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Check that names are non-empty and strictly ascending (hence unique).
pub fn validate_history(changes: &[SchemaChange]) -> Result<(), MigrationError> {
    let mut previous: Option<&str> = None;
    for change in changes {
        if change.name.trim().is_empty() {
            return Err(MigrationError::InvalidHistory(
                "migration name must not be empty".to_string(),
            ));
        }
        if let Some(prev) = previous {
            if change.name == prev {
                return Err(MigrationError::InvalidHistory(format!(
                    "duplicate migration name '{}'",
                    change.name
                )));
            }
            if change.name < prev {
                return Err(MigrationError::InvalidHistory(format!(
                    "migration '{}' is ordered after '{}'",
                    change.name, prev
                )));
            }
        }
        previous = Some(change.name);
    }
    Ok(())
}

pub struct MigrationRunner {
    pool: SqlitePool,
    changes: &'static [SchemaChange],
}

impl MigrationRunner {
    pub fn new(pool: SqlitePool, changes: &'static [SchemaChange]) -> Self {
        Self { pool, changes }
    }

    async fn ensure_ledger(&self) -> Result<(), MigrationError> {
        let ddl = format!(
            r#"CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
                   name TEXT PRIMARY KEY NOT NULL,
                   applied_at TEXT NOT NULL
               )"#
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    async fn applied(&self) -> Result<HashMap<String, DateTime<Utc>>, MigrationError> {
        self.ensure_ledger().await?;
        let select = format!("SELECT name, applied_at FROM {LEDGER_TABLE}");
        let rows = sqlx::query(&select)
            .fetch_all(&self.pool)
            .await?;

        let mut applied = HashMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            let applied_at: DateTime<Utc> = row.try_get("applied_at")?;
            applied.insert(name, applied_at);
        }
        Ok(applied)
    }

    /// Changes not yet in the ledger, in history order.
    pub async fn pending(&self) -> Result<Vec<&'static SchemaChange>, MigrationError> {
        let applied = self.applied().await?;
        let changes: &'static [SchemaChange] = self.changes;
        Ok(changes
            .iter()
            .filter(|change| !applied.contains_key(change.name))
            .collect())
    }

    pub async fn status(&self) -> Result<Vec<MigrationStatus>, MigrationError> {
        let applied = self.applied().await?;
        Ok(self
            .changes
            .iter()
            .map(|change| MigrationStatus {
                name: change.name.to_string(),
                applied_at: applied.get(change.name).copied(),
            })
            .collect())
    }

    /// Apply every pending change inside a single transaction.
    ///
    /// A failing statement rolls back the whole batch, ledger rows included.
    /// With nothing pending this is a no-op reporting zero applied.
    pub async fn apply(&self) -> Result<MigrationReport, MigrationError> {
        validate_history(self.changes)?;

        let pending = self.pending().await?;
        if pending.is_empty() {
            info!("Schema is up to date ({} migrations)", self.changes.len());
            return Ok(MigrationReport::default());
        }

        info!("Applying {} pending migration(s)", pending.len());

        let mut tx = self.pool.begin().await?;
        let applied = match apply_batch(&mut *tx, &pending).await {
            Ok(applied) => applied,
            Err(e) => {
                warn!("Migration batch failed, rolling back: {}", e);
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback after failed migration batch errored: {}", rollback_err);
                }
                return Err(e);
            }
        };
        tx.commit().await?;

        for name in &applied {
            info!("Applied migration {}", name);
        }

        Ok(MigrationReport { applied })
    }

    /// Drop one applied change's objects and remove its ledger row.
    ///
    /// Only the newest applied change can be reverted.
    pub async fn revert(&self, name: &str) -> Result<(), MigrationError> {
        let position = self
            .changes
            .iter()
            .position(|change| change.name == name)
            .ok_or_else(|| MigrationError::UnknownMigration(name.to_string()))?;
        let change = &self.changes[position];

        let applied = self.applied().await?;
        if !applied.contains_key(change.name) {
            return Err(MigrationError::NotApplied(name.to_string()));
        }
        // Later changes may reference these tables; they must go first.
        if let Some(dependent) = self.changes[position + 1..]
            .iter()
            .rev()
            .find(|later| applied.contains_key(later.name))
        {
            return Err(MigrationError::LaterChangeApplied {
                migration: change.name.to_string(),
                dependent: dependent.name.to_string(),
            });
        }

        let mut tx = self.pool.begin().await?;
        if let Err(e) = revert_one(&mut *tx, change).await {
            warn!("Revert of {} failed, rolling back: {}", change.name, e);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed revert errored: {}", rollback_err);
            }
            return Err(e);
        }
        tx.commit().await?;

        info!("Reverted migration {}", change.name);
        Ok(())
    }

    /// Revert every applied change, newest first. Returns the reverted names.
    pub async fn revert_all(&self) -> Result<Vec<String>, MigrationError> {
        let applied = self.applied().await?;
        let mut reverted = Vec::new();
        for change in self.changes.iter().rev() {
            if applied.contains_key(change.name) {
                self.revert(change.name).await?;
                reverted.push(change.name.to_string());
            }
        }
        Ok(reverted)
    }
}

async fn apply_batch(
    conn: &mut SqliteConnection,
    pending: &[&'static SchemaChange],
) -> Result<Vec<String>, MigrationError> {
    let insert = format!("INSERT INTO {LEDGER_TABLE} (name, applied_at) VALUES (?, ?)");
    let mut applied = Vec::with_capacity(pending.len());
    for change in pending {
        for object in change.forward() {
            debug!("{}: creating {}", change.name, object.name);
            sqlx::query(object.create)
                .execute(&mut *conn)
                .await
                .map_err(|source| MigrationError::Statement {
                    migration: change.name.to_string(),
                    object: object.name.to_string(),
                    source,
                })?;
        }

        sqlx::query(&insert)
            .bind(change.name)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        applied.push(change.name.to_string());
    }
    Ok(applied)
}

async fn revert_one(
    conn: &mut SqliteConnection,
    change: &SchemaChange,
) -> Result<(), MigrationError> {
    for object in change.reverse() {
        debug!("{}: dropping {}", change.name, object.name);
        sqlx::query(object.drop)
            .execute(&mut *conn)
            .await
            .map_err(|source| MigrationError::Statement {
                migration: change.name.to_string(),
                object: object.name.to_string(),
                source,
            })?;
    }

    let delete = format!("DELETE FROM {LEDGER_TABLE} WHERE name = ?");
    sqlx::query(&delete)
        .bind(change.name)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
