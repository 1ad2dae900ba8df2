//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;
use uuid::Uuid;

use agro_provision::catalog::{CatalogEntry, CatalogError, MunicipalityCatalog};
use agro_provision::database::DatabaseManager;
use agro_provision::models::{
    City, Farm, FarmHarvest, FarmHarvestCrop, Harvest, NewCity, NewFarm, NewHarvest, NewProducer,
    Producer,
};
use agro_provision::sampling::{RegionWeights, SeededValues};
use agro_provision::seed::{SeedConfig, SeedOrchestrator, SeedProfile};
use agro_provision::store::{self, EntityKind, SeedStore, SqliteSeedStore, StoreError};

// =========================================================================
// DATABASE
// =========================================================================

pub async fn memory_db() -> DatabaseManager {
    DatabaseManager::in_memory()
        .await
        .expect("in-memory database")
}

pub async fn migrated_db() -> DatabaseManager {
    let db = memory_db().await;
    db.migration_runner()
        .apply()
        .await
        .expect("schema history applies");
    db
}

/// Names of user tables (everything but SQLite internals and the ledger).
pub async fn user_tables(db: &DatabaseManager) -> Vec<String> {
    sqlx::query_scalar(
        r#"SELECT name FROM sqlite_master
           WHERE type = 'table'
             AND name NOT LIKE 'sqlite_%'
             AND name <> 'schema_migrations'
           ORDER BY name"#,
    )
    .fetch_all(db.pool())
    .await
    .expect("sqlite_master is readable")
}

pub async fn ledger_rows(db: &DatabaseManager) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(db.pool())
        .await
        .expect("ledger is readable")
}

pub async fn counts(store: &dyn SeedStore) -> HashMap<EntityKind, u64> {
    let mut counts = HashMap::new();
    for kind in EntityKind::ALL {
        counts.insert(kind, store.count(kind).await.expect("count"));
    }
    counts
}

// =========================================================================
// SEEDING FIXTURES
// =========================================================================

/// Three-region table used by most pipeline tests.
pub fn test_regions() -> RegionWeights {
    RegionWeights::new([("MT", 0.5), ("GO", 0.3), ("PR", 0.2)], "MT").expect("valid table")
}

pub fn seed_config(profile: SeedProfile) -> SeedConfig {
    SeedConfig {
        enabled: true,
        profile,
        region_delay: Duration::ZERO,
        reference_year: Some(2024),
    }
}

pub fn orchestrator(
    store: Arc<dyn SeedStore>,
    catalog: Arc<dyn MunicipalityCatalog>,
    config: SeedConfig,
    seed: u64,
) -> SeedOrchestrator {
    SeedOrchestrator::new(
        config,
        store,
        catalog,
        Box::new(SeededValues::from_seed(seed)),
    )
    .with_regions(test_regions())
}

// =========================================================================
// CATALOG FAKE
// =========================================================================

/// In-memory catalog: a fixed list per region, optionally failing regions.
#[derive(Default)]
pub struct StaticCatalog {
    regions: HashMap<String, Vec<CatalogEntry>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    fetched_at: Mutex<Vec<Instant>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` municipalities with codes unique across regions.
    pub fn with_region(mut self, region: &str, count: usize) -> Self {
        let entries = (0..count)
            .map(|i| CatalogEntry {
                external_id: format!("{}{:05}", region, i),
                name: format!("Município {} {:03}", region, i),
            })
            .collect();
        self.regions.insert(region.to_string(), entries);
        self
    }

    pub fn failing(mut self, region: &str) -> Self {
        self.failing.insert(region.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Tokio clock reading at each fetch, in call order.
    pub fn fetched_at(&self) -> Vec<Instant> {
        self.fetched_at.lock().expect("fetch times lock").clone()
    }
}

#[async_trait]
impl MunicipalityCatalog for StaticCatalog {
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(region.to_string());
        self.fetched_at
            .lock()
            .expect("fetch times lock")
            .push(Instant::now());

        if self.failing.contains(region) {
            return Err(CatalogError::Status {
                region: region.to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(self.regions.get(region).cloned().unwrap_or_default())
    }
}

// =========================================================================
// STORE WRAPPER
// =========================================================================

/// Delegates to SQLite but fails every insert of one entity kind.
pub struct FailingStore {
    inner: SqliteSeedStore,
    fail_on: EntityKind,
}

impl FailingStore {
    pub fn new(inner: SqliteSeedStore, fail_on: EntityKind) -> Self {
        Self { inner, fail_on }
    }

    fn check(&self, kind: EntityKind) -> store::Result<()> {
        if kind == self.fail_on {
            Err(StoreError::Database {
                operation: "injected failure",
                source: sqlx::Error::PoolClosed,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SeedStore for FailingStore {
    async fn is_ready(&self) -> store::Result<bool> {
        self.inner.is_ready().await
    }

    async fn count(&self, kind: EntityKind) -> store::Result<u64> {
        self.inner.count(kind).await
    }

    async fn create_cities(&self, cities: &[NewCity]) -> store::Result<u64> {
        self.check(EntityKind::City)?;
        self.inner.create_cities(cities).await
    }

    async fn find_cities_by_state(&self, state: &str, limit: u32) -> store::Result<Vec<City>> {
        self.inner.find_cities_by_state(state, limit).await
    }

    async fn create_producer(&self, producer: &NewProducer) -> store::Result<Producer> {
        self.check(EntityKind::Producer)?;
        self.inner.create_producer(producer).await
    }

    async fn list_producers(&self) -> store::Result<Vec<Producer>> {
        self.inner.list_producers().await
    }

    async fn create_farm(&self, farm: &NewFarm) -> store::Result<Farm> {
        self.check(EntityKind::Farm)?;
        self.inner.create_farm(farm).await
    }

    async fn list_farms(&self) -> store::Result<Vec<Farm>> {
        self.inner.list_farms().await
    }

    async fn create_harvest(&self, harvest: &NewHarvest) -> store::Result<Harvest> {
        self.check(EntityKind::Harvest)?;
        self.inner.create_harvest(harvest).await
    }

    async fn list_harvests(&self) -> store::Result<Vec<Harvest>> {
        self.inner.list_harvests().await
    }

    async fn create_farm_harvest(
        &self,
        farm_id: Uuid,
        harvest_id: Uuid,
    ) -> store::Result<FarmHarvest> {
        self.check(EntityKind::FarmHarvest)?;
        self.inner.create_farm_harvest(farm_id, harvest_id).await
    }

    async fn create_farm_harvest_crop(
        &self,
        farm_harvest_id: Uuid,
        crop: &str,
    ) -> store::Result<FarmHarvestCrop> {
        self.check(EntityKind::FarmHarvestCrop)?;
        self.inner.create_farm_harvest_crop(farm_harvest_id, crop).await
    }
}

// =========================================================================
// IN-MEMORY STORE
// =========================================================================

/// Store kept in vectors; never yields to the runtime, so paused-clock tests
/// only see the orchestrator's own sleeps.
#[derive(Default)]
pub struct MemoryStore {
    cities: Mutex<Vec<City>>,
    producers: Mutex<Vec<Producer>>,
    farms: Mutex<Vec<Farm>>,
    harvests: Mutex<Vec<Harvest>>,
    farm_harvests: Mutex<Vec<FarmHarvest>>,
    farm_harvest_crops: Mutex<Vec<FarmHarvestCrop>>,
}

fn len<T>(rows: &Mutex<Vec<T>>) -> u64 {
    rows.lock().expect("store lock").len() as u64
}

fn push<T: Clone>(rows: &Mutex<Vec<T>>, row: T) -> T {
    rows.lock().expect("store lock").push(row.clone());
    row
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn is_ready(&self) -> store::Result<bool> {
        Ok(true)
    }

    async fn count(&self, kind: EntityKind) -> store::Result<u64> {
        Ok(match kind {
            EntityKind::City => len(&self.cities),
            EntityKind::Producer => len(&self.producers),
            EntityKind::Farm => len(&self.farms),
            EntityKind::Harvest => len(&self.harvests),
            EntityKind::FarmHarvest => len(&self.farm_harvests),
            EntityKind::FarmHarvestCrop => len(&self.farm_harvest_crops),
        })
    }

    async fn create_cities(&self, cities: &[NewCity]) -> store::Result<u64> {
        let mut stored = self.cities.lock().expect("store lock");
        let mut inserted = 0;
        for city in cities {
            if stored.iter().any(|c| c.external_code == city.external_code) {
                continue;
            }
            stored.push(City {
                id: Uuid::new_v4(),
                name: city.name.clone(),
                state: city.state.clone(),
                external_code: city.external_code.clone(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn find_cities_by_state(&self, state: &str, limit: u32) -> store::Result<Vec<City>> {
        let mut found: Vec<City> = self
            .cities
            .lock()
            .expect("store lock")
            .iter()
            .filter(|city| city.state == state)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn create_producer(&self, producer: &NewProducer) -> store::Result<Producer> {
        Ok(push(
            &self.producers,
            Producer {
                id: Uuid::new_v4(),
                name: producer.name.clone(),
                document: producer.document.clone(),
                kind: producer.kind,
                created_at: Utc::now(),
            },
        ))
    }

    async fn list_producers(&self) -> store::Result<Vec<Producer>> {
        Ok(self.producers.lock().expect("store lock").clone())
    }

    async fn create_farm(&self, farm: &NewFarm) -> store::Result<Farm> {
        Ok(push(
            &self.farms,
            Farm {
                id: Uuid::new_v4(),
                producer_id: farm.producer_id,
                city_id: farm.city_id,
                name: farm.name.clone(),
                state: farm.state.clone(),
                total_area: farm.total_area,
                arable_area: farm.arable_area,
                vegetation_area: farm.vegetation_area,
            },
        ))
    }

    async fn list_farms(&self) -> store::Result<Vec<Farm>> {
        Ok(self.farms.lock().expect("store lock").clone())
    }

    async fn create_harvest(&self, harvest: &NewHarvest) -> store::Result<Harvest> {
        Ok(push(
            &self.harvests,
            Harvest {
                id: Uuid::new_v4(),
                year: harvest.year,
                description: harvest.description.clone(),
            },
        ))
    }

    async fn list_harvests(&self) -> store::Result<Vec<Harvest>> {
        let mut harvests = self.harvests.lock().expect("store lock").clone();
        harvests.sort_by_key(|h| h.year);
        Ok(harvests)
    }

    async fn create_farm_harvest(
        &self,
        farm_id: Uuid,
        harvest_id: Uuid,
    ) -> store::Result<FarmHarvest> {
        Ok(push(
            &self.farm_harvests,
            FarmHarvest {
                id: Uuid::new_v4(),
                farm_id,
                harvest_id,
            },
        ))
    }

    async fn create_farm_harvest_crop(
        &self,
        farm_harvest_id: Uuid,
        crop: &str,
    ) -> store::Result<FarmHarvestCrop> {
        Ok(push(
            &self.farm_harvest_crops,
            FarmHarvestCrop {
                id: Uuid::new_v4(),
                farm_harvest_id,
                crop: crop.to_string(),
            },
        ))
    }
}
