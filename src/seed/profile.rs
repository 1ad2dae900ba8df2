//! Dataset size presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row targets for one seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProfile {
    pub producers: u32,
    pub farms: u32,
    /// Length of the trailing window of harvest years, ending at the current year
    pub harvest_years: u32,
}

impl SeedProfile {
    pub const SMALL: SeedProfile = SeedProfile {
        producers: 50,
        farms: 100,
        harvest_years: 3,
    };

    pub const MEDIUM: SeedProfile = SeedProfile {
        producers: 500,
        farms: 1500,
        harvest_years: 5,
    };

    pub const LARGE: SeedProfile = SeedProfile {
        producers: 5000,
        farms: 15000,
        harvest_years: 10,
    };
}

impl Default for SeedProfile {
    fn default() -> Self {
        SeedScale::default().profile()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedScale {
    #[default]
    Small,
    Medium,
    Large,
}

impl SeedScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedScale::Small => "small",
            SeedScale::Medium => "medium",
            SeedScale::Large => "large",
        }
    }

    pub fn profile(&self) -> SeedProfile {
        match self {
            SeedScale::Small => SeedProfile::SMALL,
            SeedScale::Medium => SeedProfile::MEDIUM,
            SeedScale::Large => SeedProfile::LARGE,
        }
    }
}

impl fmt::Display for SeedScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown seed scale '{0}' (expected small, medium or large)")]
pub struct UnknownScale(pub String);

impl FromStr for SeedScale {
    type Err = UnknownScale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SeedScale::Small),
            "medium" => Ok(SeedScale::Medium),
            "large" => Ok(SeedScale::Large),
            _ => Err(UnknownScale(s.to_string())),
        }
    }
}
