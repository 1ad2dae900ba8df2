//! IBGE locality API client
//!
//! Plain HTTP client for listing the municipalities of one federative unit.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::CatalogEntry;
use super::{CatalogError, MunicipalityCatalog};

pub const IBGE_API_BASE: &str = "https://servicodados.ibge.gov.br/api/v1";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base of the locality API, already validated as a URL by config loading
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: IBGE_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct IbgeCatalogClient {
    client: Client,
    base_url: String,
}

impl IbgeCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CatalogError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn region_url(&self, region: &str) -> String {
        format!("{}/localidades/estados/{}/municipios", self.base_url, region)
    }
}

#[async_trait]
impl MunicipalityCatalog for IbgeCatalogClient {
    async fn fetch_by_region(&self, region: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = self.region_url(region);
        debug!("Fetching municipalities for {} from {}", region, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                region: region.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                region: region.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Transport {
                region: region.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| CatalogError::Decode {
            region: region.to_string(),
            source,
        })
    }
}
