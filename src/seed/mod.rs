//! Reference dataset seeding
//!
//! [`SeedOrchestrator`] fills an empty store in dependency order:
//! cities (from the municipality catalog), producers, farms, then harvest
//! years with their farm assignments and crops. Each stage is skipped when
//! rows of its kind already exist, so a rerun never duplicates data.

pub mod fake;
mod orchestrator;
mod profile;

pub use orchestrator::SeedOrchestrator;
pub use profile::{SeedProfile, SeedScale, UnknownScale};

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::store::{EntityKind, StoreError};

/// Pause between two catalog requests.
pub const DEFAULT_REGION_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub profile: SeedProfile,
    pub region_delay: Duration,
    /// Last year of the harvest window; the current year when unset
    pub reference_year: Option<i32>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            profile: SeedProfile::default(),
            region_delay: DEFAULT_REGION_DELAY,
            reference_year: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeedStage {
    Cities,
    Producers,
    Farms,
    Harvests,
}

impl fmt::Display for SeedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedStage::Cities => "cities",
            SeedStage::Producers => "producers",
            SeedStage::Farms => "farms",
            SeedStage::Harvests => "harvests",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Seeded { created: u64 },
    /// Rows already existed; nothing was written
    Skipped { existing: u64 },
}

impl StageOutcome {
    pub fn created(&self) -> u64 {
        match self {
            StageOutcome::Seeded { created } => *created,
            StageOutcome::Skipped { .. } => 0,
        }
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped { .. })
    }
}

/// What one completed run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub cities: StageOutcome,
    pub producers: StageOutcome,
    pub farms: StageOutcome,
    pub harvests: StageOutcome,
    pub farm_harvests: u64,
    pub farm_harvest_crops: u64,
    /// Regions whose municipalities could not be fetched or stored
    pub failed_regions: Vec<String>,
}

impl SeedReport {
    pub fn total_created(&self) -> u64 {
        self.cities.created()
            + self.producers.created()
            + self.farms.created()
            + self.harvests.created()
            + self.farm_harvests
            + self.farm_harvest_crops
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SeedRun {
    /// Seeding is switched off in configuration
    Disabled,
    /// The schema is not there yet
    StoreNotReady,
    Completed(SeedReport),
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cannot seed {stage}: no {dependency} rows exist")]
    MissingDependency {
        stage: SeedStage,
        dependency: EntityKind,
    },

    #[error("Cannot seed farms: no region has any municipalities")]
    NoMunicipalities,
}
