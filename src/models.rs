//! Registry entities written by the seeding pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Producer legal kind. Decides the document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerKind {
    /// Natural person, identified by an 11-digit CPF
    Individual,
    /// Legal entity, identified by a 14-digit CNPJ
    Company,
}

impl ProducerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProducerKind::Individual => "individual",
            ProducerKind::Company => "company",
        }
    }

    pub fn document_len(&self) -> usize {
        match self {
            ProducerKind::Individual => 11,
            ProducerKind::Company => 14,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "individual" => Some(ProducerKind::Individual),
            "company" => Some(ProducerKind::Company),
            _ => None,
        }
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProducer {
    pub name: String,
    pub document: String,
    pub kind: ProducerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub kind: ProducerKind,
    pub created_at: DateTime<Utc>,
}

/// Municipality, unique on `external_code` (the IBGE code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub state: String,
    pub external_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub external_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFarm {
    pub producer_id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub state: String,
    pub total_area: Decimal,
    pub arable_area: Decimal,
    pub vegetation_area: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub city_id: Uuid,
    pub name: String,
    pub state: String,
    pub total_area: Decimal,
    pub arable_area: Decimal,
    pub vegetation_area: Decimal,
}

impl Farm {
    /// `arable + vegetation <= total`, compared exactly.
    pub fn areas_consistent(&self) -> bool {
        self.arable_area + self.vegetation_area <= self.total_area
    }
}

/// One agricultural season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHarvest {
    pub year: i32,
    pub description: String,
}

impl NewHarvest {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            description: format!("Safra {}", year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    pub id: Uuid,
    pub year: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmHarvest {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub harvest_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmHarvestCrop {
    pub id: Uuid,
    pub farm_harvest_id: Uuid,
    pub crop: String,
}
