// Adapters layer: concrete implementations for external systems (HTTP APIs, files).

pub mod http;
pub mod storage;

use crate::config::toml_config::DataConfig;
use crate::core::DataSource;
use crate::utils::error::{DashboardError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

pub use http::{HttpDataSource, LogoLookup, MarketApi, SportsApi};
pub use storage::LocalStorage;

/// 靜態資料來源：本機目錄或遠端 base URL
#[derive(Debug, Clone)]
pub enum StaticData {
    Local(LocalStorage),
    Remote(HttpDataSource),
}

impl StaticData {
    pub fn from_config(config: &DataConfig, client: Client) -> Self {
        if config.is_remote() {
            Self::Remote(HttpDataSource::new(client, config.location.clone()))
        } else {
            Self::Local(LocalStorage::new(config.location.clone()))
        }
    }
}

impl DataSource for StaticData {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            Self::Local(local) => local.fetch(name).await,
            Self::Remote(remote) => remote.fetch(name).await,
        }
    }
}

/// Fetches `name` and parses it, naming the file in the error when parsing fails.
pub async fn read_json<T, D>(source: &D, name: &str) -> Result<T>
where
    T: DeserializeOwned,
    D: DataSource,
{
    let bytes = source.fetch(name).await?;
    serde_json::from_slice(&bytes).map_err(|e| DashboardError::DataUnavailable {
        message: format!("{} is not in the expected format: {}", name, e),
    })
}
