//! Storage port for the seeding pipeline.
//! Implemented by [`SqliteSeedStore`]; the orchestrator depends only on the trait.

mod sqlite;

pub use sqlite::SqliteSeedStore;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    City, Farm, FarmHarvest, FarmHarvestCrop, Harvest, NewCity, NewFarm, NewHarvest, NewProducer,
    Producer,
};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid value in column '{column}': {value}")]
    InvalidColumn { column: &'static str, value: String },
}

impl StoreError {
    pub(crate) fn database(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Database { operation, source }
    }
}

/// Entity kinds the pipeline counts before seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    City,
    Producer,
    Farm,
    Harvest,
    FarmHarvest,
    FarmHarvestCrop,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::City,
        EntityKind::Producer,
        EntityKind::Farm,
        EntityKind::Harvest,
        EntityKind::FarmHarvest,
        EntityKind::FarmHarvestCrop,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::City => "cities",
            EntityKind::Producer => "producers",
            EntityKind::Farm => "farms",
            EntityKind::Harvest => "harvests",
            EntityKind::FarmHarvest => "farm_harvests",
            EntityKind::FarmHarvestCrop => "farm_harvest_crops",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Create/count/query operations per entity kind.
#[async_trait]
pub trait SeedStore: Send + Sync {
    // ── Readiness ──────────────────────────────────────────────

    /// Whether the schema the pipeline writes to exists.
    async fn is_ready(&self) -> Result<bool>;

    async fn count(&self, kind: EntityKind) -> Result<u64>;

    // ── Cities ─────────────────────────────────────────────────

    /// Insert one region's municipalities atomically, skipping codes that
    /// already exist. Returns the number of rows inserted.
    async fn create_cities(&self, cities: &[NewCity]) -> Result<u64>;

    /// Up to `limit` municipalities of `state`, ordered by name.
    async fn find_cities_by_state(&self, state: &str, limit: u32) -> Result<Vec<City>>;

    // ── Producers and farms ────────────────────────────────────

    async fn create_producer(&self, producer: &NewProducer) -> Result<Producer>;

    async fn list_producers(&self) -> Result<Vec<Producer>>;

    async fn create_farm(&self, farm: &NewFarm) -> Result<Farm>;

    async fn list_farms(&self) -> Result<Vec<Farm>>;

    // ── Harvests and crops ─────────────────────────────────────

    async fn create_harvest(&self, harvest: &NewHarvest) -> Result<Harvest>;

    /// All harvest years, oldest first.
    async fn list_harvests(&self) -> Result<Vec<Harvest>>;

    async fn create_farm_harvest(&self, farm_id: Uuid, harvest_id: Uuid) -> Result<FarmHarvest>;

    async fn create_farm_harvest_crop(
        &self,
        farm_harvest_id: Uuid,
        crop: &str,
    ) -> Result<FarmHarvestCrop>;
}
