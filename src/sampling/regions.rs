//! Weighted region selection.

use serde::Serialize;

use super::values::ValueProvider;
use super::SamplingError;

/// Brazilian federative units with the share of farms expected in each.
/// Weights sum to 1.0; the agricultural frontier states dominate.
const BRAZIL_WEIGHTS: &[(&str, f64)] = &[
    ("MT", 0.12),
    ("PR", 0.10),
    ("RS", 0.10),
    ("MG", 0.10),
    ("SP", 0.09),
    ("GO", 0.08),
    ("MS", 0.07),
    ("BA", 0.06),
    ("SC", 0.04),
    ("PA", 0.03),
    ("TO", 0.03),
    ("MA", 0.03),
    ("PI", 0.02),
    ("RO", 0.02),
    ("ES", 0.02),
    ("CE", 0.01),
    ("PE", 0.01),
    ("AC", 0.01),
    ("AL", 0.01),
    ("PB", 0.01),
    ("RN", 0.01),
    ("AM", 0.005),
    ("AP", 0.005),
    ("DF", 0.005),
    ("RJ", 0.005),
    ("RR", 0.005),
    ("SE", 0.005),
];

const BRAZIL_DEFAULT: &str = "MT";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionWeight {
    pub code: String,
    pub weight: f64,
}

/// Ordered region → probability table with a fallback region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionWeights {
    entries: Vec<RegionWeight>,
    default_code: String,
}

impl RegionWeights {
    pub fn new<I, S>(entries: I, default_code: &str) -> Result<Self, SamplingError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries: Vec<RegionWeight> = entries
            .into_iter()
            .map(|(code, weight)| RegionWeight {
                code: code.into(),
                weight,
            })
            .collect();

        if entries.is_empty() {
            return Err(SamplingError::EmptyRegionTable);
        }
        if let Some(bad) = entries
            .iter()
            .find(|e| !e.weight.is_finite() || e.weight < 0.0)
        {
            return Err(SamplingError::InvalidWeight {
                code: bad.code.clone(),
                weight: bad.weight,
            });
        }
        if !entries.iter().any(|e| e.code == default_code) {
            return Err(SamplingError::UnknownDefault(default_code.to_string()));
        }

        Ok(Self {
            entries,
            default_code: default_code.to_string(),
        })
    }

    /// The national table used for seeding.
    pub fn brazil() -> Self {
        Self {
            entries: BRAZIL_WEIGHTS
                .iter()
                .map(|(code, weight)| RegionWeight {
                    code: (*code).to_string(),
                    weight: *weight,
                })
                .collect(),
            default_code: BRAZIL_DEFAULT.to_string(),
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    pub fn entries(&self) -> &[RegionWeight] {
        &self.entries
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    /// First region whose cumulative weight reaches `r`.
    ///
    /// When float drift leaves `r` above the final cumulative sum the default
    /// region is returned, so the result is always a member of the table.
    pub fn select(&self, r: f64) -> &str {
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.weight;
            if cumulative >= r {
                return &entry.code;
            }
        }
        &self.default_code
    }

    /// Draw one region.
    pub fn sample(&self, values: &mut dyn ValueProvider) -> &str {
        self.select(values.unit())
    }

    /// The same table limited to `codes`, renormalised to sum to 1.
    ///
    /// Keeps the default when it survives, otherwise the first surviving
    /// region takes over. `None` when no region survives.
    pub fn restricted_to(&self, codes: &[&str]) -> Option<Self> {
        let kept: Vec<&RegionWeight> = self
            .entries
            .iter()
            .filter(|e| codes.contains(&e.code.as_str()))
            .collect();
        let first = kept.first()?;

        let total: f64 = kept.iter().map(|e| e.weight).sum();
        let entries = kept
            .iter()
            .map(|e| RegionWeight {
                code: e.code.clone(),
                weight: if total > 0.0 {
                    e.weight / total
                } else {
                    1.0 / kept.len() as f64
                },
            })
            .collect();

        let default_code = if codes.contains(&self.default_code.as_str()) {
            self.default_code.clone()
        } else {
            first.code.clone()
        };

        Some(Self {
            entries,
            default_code,
        })
    }
}
