//! Distribution sampling for synthetic data
//!
//! - weighted region selection ([`RegionWeights`])
//! - constrained area generation ([`generate_areas`])
//! - crop combination choice ([`pick_crop_combination`])
//! - the seedable random source behind all of them ([`ValueProvider`])

mod areas;
mod crops;
mod regions;
mod values;

pub use areas::{generate_areas, AreaBreakdown};
pub use crops::{pick_crop_combination, CropCombination, CROP_COMBINATIONS};
pub use regions::{RegionWeight, RegionWeights};
pub use values::{non_empty_subset, pick, SeededValues, ValueProvider};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Region table is empty")]
    EmptyRegionTable,

    #[error("Region '{code}' has invalid weight {weight}")]
    InvalidWeight { code: String, weight: f64 },

    #[error("Default region '{0}' is not in the table")]
    UnknownDefault(String),
}
