use crate::adapters::read_json;
use crate::app::pipelines::write_json;
use crate::core::health;
use crate::core::{DataSource, Pipeline, Storage};
use crate::domain::health::{HealthView, TidyRecord};
use crate::utils::error::Result;

pub const HEALTH_OUTPUT: &str = "health.json";
pub const HEALTH_PIVOT_CSV: &str = "health_pivot.csv";

pub struct HealthOutput {
    pub view: HealthView,
    pub pivot_csv: String,
}

pub struct HealthPipeline<D: DataSource, S: Storage> {
    data: D,
    storage: S,
    health_file: String,
}

impl<D: DataSource, S: Storage> HealthPipeline<D, S> {
    pub fn new(data: D, storage: S, health_file: impl Into<String>) -> Self {
        Self {
            data,
            storage,
            health_file: health_file.into(),
        }
    }
}

#[async_trait::async_trait]
impl<D: DataSource, S: Storage> Pipeline for HealthPipeline<D, S> {
    type Raw = Vec<TidyRecord>;
    type Output = HealthOutput;

    fn name(&self) -> &str {
        "health"
    }

    async fn extract(&self) -> Result<Vec<TidyRecord>> {
        let records: Vec<TidyRecord> = read_json(&self.data, &self.health_file).await?;
        tracing::info!("Loaded {} healthcare rows", records.len());
        Ok(records)
    }

    async fn transform(&self, raw: Vec<TidyRecord>) -> Result<HealthOutput> {
        let (years, rows) = health::pivot(&raw);
        let pivot_csv = health::pivot_csv(&years, &rows)?;
        Ok(HealthOutput {
            view: health::build_view(&raw),
            pivot_csv,
        })
    }

    async fn load(&self, output: HealthOutput) -> Result<String> {
        self.storage
            .write_file(HEALTH_PIVOT_CSV, output.pivot_csv.as_bytes())
            .await?;
        write_json(&self.storage, HEALTH_OUTPUT, &output.view).await
    }
}
