//! Municipality catalog integration
//!
//! This module provides:
//! - [`MunicipalityCatalog`]: fetch every municipality of one region code
//! - [`IbgeCatalogClient`]: the HTTP implementation over the IBGE locality API
//!
//! The client makes exactly one request per call and knows nothing about
//! persistence, retries or throttling; the seeding pipeline owns those.

mod client;
mod types;

pub use client::{CatalogConfig, IbgeCatalogClient, IBGE_API_BASE};
pub use types::CatalogEntry;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from one catalog fetch. Always carries the region code.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request for region {region} failed: {source}")]
    Transport {
        region: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Catalog returned HTTP {status} for region {region}")]
    Status {
        region: String,
        status: reqwest::StatusCode,
    },

    #[error("Catalog response for region {region} could not be decoded: {source}")]
    Decode {
        region: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl CatalogError {
    /// Region the failed request was for, if any.
    pub fn region(&self) -> Option<&str> {
        match self {
            CatalogError::Transport { region, .. }
            | CatalogError::Status { region, .. }
            | CatalogError::Decode { region, .. } => Some(region),
            CatalogError::Client(_) => None,
        }
    }
}

#[async_trait]
pub trait MunicipalityCatalog: Send + Sync {
    /// Fetch every municipality of `region`. One request, no retries.
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
}
