//! Declarative schema migrations
//!
//! The schema history is plain ordered data ([`SchemaChange`] records), consumed
//! uniformly by [`MigrationRunner`]. Applied names are tracked in the
//! `schema_migrations` ledger table.

mod history;
mod runner;

pub use history::SCHEMA_HISTORY;
pub use runner::{
    validate_history, MigrationReport, MigrationRunner, MigrationStatus, LEDGER_TABLE,
};

use thiserror::Error;

/// One versioned schema change. Immutable once authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaChange {
    /// Timestamp-prefixed unique name, e.g. `20240115090000_create_producers`
    pub name: &'static str,
    pub tables: &'static [SchemaObject],
    pub indexes: &'static [SchemaObject],
}

/// A table or index with its forward and reverse statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaObject {
    pub name: &'static str,
    pub create: &'static str,
    pub drop: &'static str,
}

impl SchemaChange {
    /// Forward statements: tables first, then indexes, in authored order.
    pub fn forward(&self) -> impl Iterator<Item = &SchemaObject> {
        self.tables.iter().chain(self.indexes.iter())
    }

    /// Reverse statements: indexes in reverse, then tables in reverse.
    pub fn reverse(&self) -> impl Iterator<Item = &SchemaObject> {
        self.indexes.iter().rev().chain(self.tables.iter().rev())
    }
}

/// Migration errors. Every variant is fatal to startup.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Invalid schema history: {0}")]
    InvalidHistory(String),

    #[error("Unknown migration '{0}'")]
    UnknownMigration(String),

    #[error("Migration '{0}' has not been applied")]
    NotApplied(String),

    #[error("Cannot revert '{migration}' while '{dependent}' is still applied")]
    LaterChangeApplied {
        migration: String,
        dependent: String,
    },

    #[error("Migration '{migration}' failed on '{object}': {source}")]
    Statement {
        migration: String,
        object: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Migration ledger error: {0}")]
    Ledger(#[from] sqlx::Error),
}
