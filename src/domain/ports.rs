use crate::utils::error::Result;
use async_trait::async_trait;

/// 輸出目的地
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, reported back to the user.
    fn full_path(&self, path: &str) -> String;
}

/// Where the static dashboard data files (GeoJSON, JSON) are read from.
pub trait DataSource: Send + Sync {
    fn fetch(&self, name: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send;
    type Output: Send + Sync;

    /// View name used in logs and in the run summary.
    fn name(&self) -> &str;

    async fn extract(&self) -> Result<Self::Raw>;
    async fn transform(&self, raw: Self::Raw) -> Result<Self::Output>;
    async fn load(&self, output: Self::Output) -> Result<String>;
}
