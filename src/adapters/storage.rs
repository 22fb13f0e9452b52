use crate::core::{DataSource, Storage};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 本機目錄；同時作為輸出目的地與靜態資料來源
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.base_path.join(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }

    fn full_path(&self, path: &str) -> String {
        self.base_path.join(path).display().to_string()
    }
}

impl DataSource for LocalStorage {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.read_file(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/house.json", b"{}").await.unwrap();

        let data = storage.read_file("nested/house.json").await.unwrap();
        assert_eq!(data, b"{}");
        assert!(storage.full_path("nested/house.json").ends_with("house.json"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.fetch("congress.geojson").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::DashboardError::IoError(_)));
    }
}
