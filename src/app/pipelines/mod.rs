pub mod election_pipeline;
pub mod health_pipeline;
pub mod sports_pipeline;
pub mod stock_pipeline;

pub use election_pipeline::{HousePipeline, SenatePipeline};
pub use health_pipeline::HealthPipeline;
pub use sports_pipeline::{GamesPipeline, PlayersPipeline, ShotChartPipeline};
pub use stock_pipeline::StockPipeline;

use crate::core::Storage;
use crate::utils::error::Result;
use serde::Serialize;

/// 將輸出序列化成 JSON 並寫入 storage，回傳完整路徑
pub async fn write_json<S, T>(storage: &S, name: &str, value: &T) -> Result<String>
where
    S: Storage,
    T: Serialize + Sync,
{
    let bytes = serde_json::to_vec_pretty(value)?;
    tracing::debug!("Writing {} ({} bytes)", name, bytes.len());
    storage.write_file(name, &bytes).await?;
    Ok(storage.full_path(name))
}
