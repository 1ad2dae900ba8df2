//! Staged seeding run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{fake, SeedConfig, SeedError, SeedReport, SeedRun, SeedStage, StageOutcome};
use crate::catalog::{CatalogError, MunicipalityCatalog};
use crate::models::{City, NewCity, NewFarm, NewHarvest, NewProducer, ProducerKind};
use crate::sampling::{
    generate_areas, non_empty_subset, pick, pick_crop_combination, RegionWeights, ValueProvider,
};
use crate::store::{EntityKind, SeedStore, StoreError};

/// Share of producers registered as companies.
const COMPANY_SHARE: f64 = 0.3;

/// Municipalities considered per region when placing farms.
const MUNICIPALITY_POOL_SIZE: u32 = 100;

#[derive(Error, Debug)]
enum RegionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SeedOrchestrator {
    config: SeedConfig,
    store: Arc<dyn SeedStore>,
    catalog: Arc<dyn MunicipalityCatalog>,
    values: Box<dyn ValueProvider>,
    regions: RegionWeights,
}

impl SeedOrchestrator {
    pub fn new(
        config: SeedConfig,
        store: Arc<dyn SeedStore>,
        catalog: Arc<dyn MunicipalityCatalog>,
        values: Box<dyn ValueProvider>,
    ) -> Self {
        Self {
            config,
            store,
            catalog,
            values,
            regions: RegionWeights::brazil(),
        }
    }

    /// Replace the region table (catalog iteration order and farm placement).
    pub fn with_regions(mut self, regions: RegionWeights) -> Self {
        self.regions = regions;
        self
    }

    /// Run every stage in dependency order.
    ///
    /// Disabled runs and runs against a store without schema return early
    /// without touching anything. Catalog or storage failures for a single
    /// region are logged and reported; any other storage failure aborts.
    pub async fn run(&mut self) -> Result<SeedRun, SeedError> {
        if !self.config.enabled {
            info!("Seeding disabled; skipping");
            return Ok(SeedRun::Disabled);
        }

        if !self.store.is_ready().await? {
            info!("Store schema not ready; skipping seeding");
            return Ok(SeedRun::StoreNotReady);
        }

        let profile = self.config.profile;
        info!(
            "Seeding reference data: {} producers, {} farms, {} harvest years",
            profile.producers, profile.farms, profile.harvest_years
        );

        // ── 1. Cities ──
        let mut failed_regions = Vec::new();
        let cities = self.seed_cities(&mut failed_regions).await?;

        // ── 2. Producers ──
        let producers = self.seed_producers().await?;

        // ── 3. Farms ──
        let farms = self.seed_farms().await?;

        // ── 4. Harvests, farm assignments and crops ──
        let (harvests, farm_harvests, farm_harvest_crops) = self.seed_harvests().await?;

        let report = SeedReport {
            cities,
            producers,
            farms,
            harvests,
            farm_harvests,
            farm_harvest_crops,
            failed_regions,
        };
        info!(
            "Seeding complete: {} rows created, {} regions failed",
            report.total_created(),
            report.failed_regions.len()
        );
        Ok(SeedRun::Completed(report))
    }

    async fn existing(&self, stage: SeedStage, kind: EntityKind) -> Result<Option<u64>, SeedError> {
        let existing = self.store.count(kind).await?;
        if existing > 0 {
            info!("{} already seeded ({} rows); skipping", stage, existing);
            Ok(Some(existing))
        } else {
            Ok(None)
        }
    }

    // ── Cities ───────────────────────────────────────────────────

    async fn seed_cities(
        &mut self,
        failed_regions: &mut Vec<String>,
    ) -> Result<StageOutcome, SeedError> {
        if let Some(existing) = self.existing(SeedStage::Cities, EntityKind::City).await? {
            return Ok(StageOutcome::Skipped { existing });
        }

        let codes: Vec<String> = self.regions.codes().map(str::to_string).collect();
        let mut created = 0;

        for (i, code) in codes.iter().enumerate() {
            match self.seed_region(code).await {
                Ok(inserted) => {
                    debug!("Stored {} municipalities for {}", inserted, code);
                    created += inserted;
                }
                Err(e) => {
                    warn!("Skipping municipalities for region {}: {}", code, e);
                    failed_regions.push(code.clone());
                }
            }

            if i + 1 < codes.len() && !self.config.region_delay.is_zero() {
                tokio::time::sleep(self.config.region_delay).await;
            }
        }

        info!(
            "Seeded {} municipalities from {} regions",
            created,
            codes.len() - failed_regions.len()
        );
        Ok(StageOutcome::Seeded { created })
    }

    async fn seed_region(&self, code: &str) -> Result<u64, RegionError> {
        let entries = self.catalog.fetch_by_region(code).await?;
        let cities: Vec<NewCity> = entries
            .into_iter()
            .map(|entry| NewCity {
                name: entry.name,
                state: code.to_string(),
                external_code: entry.external_id,
            })
            .collect();
        Ok(self.store.create_cities(&cities).await?)
    }

    // ── Producers ────────────────────────────────────────────────

    async fn seed_producers(&mut self) -> Result<StageOutcome, SeedError> {
        if let Some(existing) = self
            .existing(SeedStage::Producers, EntityKind::Producer)
            .await?
        {
            return Ok(StageOutcome::Skipped { existing });
        }

        let mut documents = HashSet::new();
        let mut created = 0;

        for _ in 0..self.config.profile.producers {
            let values = self.values.as_mut();
            let kind = if values.chance(COMPANY_SHARE) {
                ProducerKind::Company
            } else {
                ProducerKind::Individual
            };
            let name = fake::producer_name(values, kind);
            let document = loop {
                let candidate = fake::document(values, kind);
                if documents.insert(candidate.clone()) {
                    break candidate;
                }
            };

            let producer = self
                .store
                .create_producer(&NewProducer {
                    name,
                    document,
                    kind,
                })
                .await?;
            debug!("Created producer {} ({})", producer.id, producer.kind);
            created += 1;
        }

        info!("Seeded {} producers", created);
        Ok(StageOutcome::Seeded { created })
    }

    // ── Farms ────────────────────────────────────────────────────

    async fn seed_farms(&mut self) -> Result<StageOutcome, SeedError> {
        if let Some(existing) = self.existing(SeedStage::Farms, EntityKind::Farm).await? {
            return Ok(StageOutcome::Skipped { existing });
        }
        if self.config.profile.farms == 0 {
            return Ok(StageOutcome::Seeded { created: 0 });
        }

        let producers = self.store.list_producers().await?;
        if producers.is_empty() {
            return Err(SeedError::MissingDependency {
                stage: SeedStage::Farms,
                dependency: EntityKind::Producer,
            });
        }

        let pools = self.load_municipality_pools().await?;
        let stocked: Vec<&str> = pools
            .iter()
            .filter(|(_, cities)| !cities.is_empty())
            .map(|(code, _)| code.as_str())
            .collect();
        let Some(fallback) = self.regions.restricted_to(&stocked) else {
            return Err(SeedError::NoMunicipalities);
        };

        let mut created = 0;
        for _ in 0..self.config.profile.farms {
            let values = self.values.as_mut();

            let Some(producer) = pick(values, &producers) else {
                break;
            };

            let mut region = self.regions.sample(values);
            if pools.get(region).map_or(true, Vec::is_empty) {
                region = fallback.sample(values);
            }
            let Some(city) = pools.get(region).and_then(|cities| pick(values, cities)) else {
                return Err(SeedError::NoMunicipalities);
            };

            let areas = generate_areas(values);
            let farm = NewFarm {
                producer_id: producer.id,
                city_id: city.id,
                name: fake::farm_name(values),
                state: region.to_string(),
                total_area: areas.total,
                arable_area: areas.arable,
                vegetation_area: areas.vegetation,
            };

            let farm = self.store.create_farm(&farm).await?;
            debug!("Created farm {} in {}/{}", farm.id, city.name, farm.state);
            created += 1;
        }

        info!("Seeded {} farms", created);
        Ok(StageOutcome::Seeded { created })
    }

    /// First municipalities of every region, ordered by name.
    async fn load_municipality_pools(&self) -> Result<HashMap<String, Vec<City>>, SeedError> {
        let mut pools = HashMap::new();
        for code in self.regions.codes() {
            let cities = self
                .store
                .find_cities_by_state(code, MUNICIPALITY_POOL_SIZE)
                .await?;
            if cities.is_empty() {
                debug!("No municipalities stored for {}", code);
            }
            pools.insert(code.to_string(), cities);
        }
        Ok(pools)
    }

    // ── Harvests and crops ───────────────────────────────────────

    async fn seed_harvests(&mut self) -> Result<(StageOutcome, u64, u64), SeedError> {
        if let Some(existing) = self
            .existing(SeedStage::Harvests, EntityKind::Harvest)
            .await?
        {
            return Ok((StageOutcome::Skipped { existing }, 0, 0));
        }

        let last_year = self
            .config
            .reference_year
            .unwrap_or_else(|| Utc::now().year());
        let window = self.config.profile.harvest_years as i32;

        let mut harvests = Vec::new();
        for year in (last_year - window + 1)..=last_year {
            let harvest = self
                .store
                .create_harvest(&NewHarvest::for_year(year))
                .await?;
            debug!("Created harvest {}", harvest.year);
            harvests.push(harvest);
        }

        let farms = self.store.list_farms().await?;
        let mut farm_harvests = 0;
        let mut crops = 0;

        for farm in &farms {
            let years = non_empty_subset(self.values.as_mut(), &harvests);
            for harvest in &years {
                let assignment = self
                    .store
                    .create_farm_harvest(farm.id, harvest.id)
                    .await?;
                farm_harvests += 1;

                for crop in pick_crop_combination(self.values.as_mut()) {
                    self.store
                        .create_farm_harvest_crop(assignment.id, crop)
                        .await?;
                    crops += 1;
                }
            }
        }

        info!(
            "Seeded {} harvests, {} farm assignments, {} crop rows",
            harvests.len(),
            farm_harvests,
            crops
        );
        Ok((
            StageOutcome::Seeded {
                created: harvests.len() as u64,
            },
            farm_harvests,
            crops,
        ))
    }
}
