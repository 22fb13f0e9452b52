use crate::adapters::http::build_client;
use crate::adapters::{LocalStorage, LogoLookup, MarketApi, SportsApi, StaticData};
use crate::app::pipelines::election_pipeline::{HOUSE_OUTPUT, SENATE_OUTPUT};
use crate::app::pipelines::health_pipeline::{HEALTH_OUTPUT, HEALTH_PIVOT_CSV};
use crate::app::pipelines::sports_pipeline::{
    ShotChartFiles, GAMES_OUTPUT, PLAYERS_OUTPUT, SHOTS_OUTPUT,
};
use crate::app::pipelines::{
    write_json, GamesPipeline, HealthPipeline, HousePipeline, PlayersPipeline, SenatePipeline,
    ShotChartPipeline, StockPipeline,
};
use crate::config::DashboardConfig;
use crate::core::etl::EtlEngine;
use crate::core::{Pipeline, Storage};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const SUMMARY_OUTPUT: &str = "summary.json";
pub const BUNDLE_OUTPUT: &str = "dashboard_bundle.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    House,
    Senate,
    Games,
    Players,
    Shots,
    Stock { symbol: Option<String> },
    Health,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::House => "house",
            View::Senate => "senate",
            View::Games => "games",
            View::Players => "players",
            View::Shots => "shots",
            View::Stock { .. } => "stock",
            View::Health => "health",
        }
    }

    /// Files a successful run of this view leaves in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        match self {
            View::House => vec![HOUSE_OUTPUT.to_string()],
            View::Senate => vec![SENATE_OUTPUT.to_string()],
            View::Games => vec![GAMES_OUTPUT.to_string()],
            View::Players => vec![PLAYERS_OUTPUT.to_string()],
            View::Shots => vec![SHOTS_OUTPUT.to_string()],
            View::Stock { symbol } => symbol
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .map(|s| vec![StockPipeline::<LocalStorage>::output_name(&s)])
                .unwrap_or_default(),
            View::Health => vec![HEALTH_OUTPUT.to_string(), HEALTH_PIVOT_CSV.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewOutcome {
    pub view: String,
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip)]
    pub files: Vec<String>,
}

impl ViewOutcome {
    pub fn from_result(view: &View, result: Result<String>) -> Self {
        match result {
            Ok(output) => Self {
                view: view.name().to_string(),
                status: ViewStatus::Ok,
                output: Some(output),
                error: None,
                status_code: None,
                files: view.output_files(),
            },
            Err(e) => {
                tracing::error!("❌ View '{}' failed: {}", view.name(), e);
                Self {
                    view: view.name().to_string(),
                    status: ViewStatus::Error,
                    output: None,
                    error: Some(e.user_friendly_message()),
                    status_code: Some(e.status_code()),
                    files: Vec::new(),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ViewStatus::Ok
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub views: Vec<ViewOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_error: Option<String>,
}

impl RunSummary {
    pub fn failed_views(&self) -> impl Iterator<Item = &ViewOutcome> {
        self.views.iter().filter(|v| !v.is_ok())
    }
}

/// 依設定建立各 view 的 pipeline 並執行
pub struct Dashboard {
    config: DashboardConfig,
    client: Client,
    data: StaticData,
    storage: LocalStorage,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        let data = StaticData::from_config(&config.data, client.clone());
        let storage = LocalStorage::new(config.load.output_path.clone());
        Ok(Self {
            config,
            client,
            data,
            storage,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn sports_api(&self) -> SportsApi {
        SportsApi::new(self.client.clone(), self.config.sources.sports_base_url.clone())
    }

    async fn execute<P: Pipeline>(&self, pipeline: P) -> Result<String> {
        EtlEngine::new_with_monitoring(pipeline, self.config.monitoring.enabled)
            .run()
            .await
    }

    pub async fn run_view(&self, view: &View) -> Result<String> {
        let data = &self.config.data;
        let sports = &self.config.sports;
        match view {
            View::House => {
                self.execute(HousePipeline::new(
                    self.data.clone(),
                    self.storage.clone(),
                    data.house_boundaries.clone(),
                    data.house_results.clone(),
                ))
                .await
            }
            View::Senate => {
                self.execute(SenatePipeline::new(
                    self.data.clone(),
                    self.storage.clone(),
                    data.senate.clone(),
                ))
                .await
            }
            View::Games => {
                self.execute(GamesPipeline::new(
                    self.sports_api(),
                    self.storage.clone(),
                    sports.season,
                    sports.per_page,
                ))
                .await
            }
            View::Players => {
                self.execute(PlayersPipeline::new(
                    self.sports_api(),
                    self.storage.clone(),
                    sports.season,
                    sports.per_page,
                ))
                .await
            }
            View::Shots => {
                let files = ShotChartFiles {
                    shots: data.shots.clone(),
                    player_stats: data.player_stats.clone(),
                    upcoming_games: data.upcoming_games.clone(),
                };
                self.execute(ShotChartPipeline::new(
                    self.data.clone(),
                    self.storage.clone(),
                    files,
                ))
                .await
            }
            View::Stock { symbol } => {
                let sources = &self.config.sources;
                let market = MarketApi::new(
                    self.client.clone(),
                    sources.market_base_url.clone(),
                    self.config.api_key(),
                );
                let logos = LogoLookup::new(
                    self.client.clone(),
                    sources.logo_search_base_url.clone(),
                    sources.logo_image_base_url.clone(),
                );
                self.execute(StockPipeline::new(
                    market,
                    logos,
                    self.storage.clone(),
                    symbol.clone(),
                ))
                .await
            }
            View::Health => {
                self.execute(HealthPipeline::new(
                    self.data.clone(),
                    self.storage.clone(),
                    data.health.clone(),
                ))
                .await
            }
        }
    }

    /// Runs every view concurrently. A failed view is recorded, not propagated.
    pub async fn run_all(&self, symbol: Option<String>) -> Result<RunSummary> {
        let stock_view = symbol.map(|s| View::Stock { symbol: Some(s) });
        let stock = async {
            match &stock_view {
                Some(view) => Some((view, self.run_view(view).await)),
                None => None,
            }
        };

        let (house, senate, games, players, shots, health, stock) = tokio::join!(
            self.run_view(&View::House),
            self.run_view(&View::Senate),
            self.run_view(&View::Games),
            self.run_view(&View::Players),
            self.run_view(&View::Shots),
            self.run_view(&View::Health),
            stock,
        );

        let mut views = vec![
            ViewOutcome::from_result(&View::House, house),
            ViewOutcome::from_result(&View::Senate, senate),
            ViewOutcome::from_result(&View::Games, games),
            ViewOutcome::from_result(&View::Players, players),
            ViewOutcome::from_result(&View::Shots, shots),
            ViewOutcome::from_result(&View::Health, health),
        ];
        if let Some((view, result)) = stock {
            views.push(ViewOutcome::from_result(view, result));
        }

        self.finish_run(views).await
    }

    /// Writes `summary.json` and, when enabled, the bundle. A bundle failure
    /// is recorded in the summary instead of aborting the run.
    async fn finish_run(&self, views: Vec<ViewOutcome>) -> Result<RunSummary> {
        let mut summary = RunSummary {
            generated_at: Utc::now(),
            views,
            bundle: None,
            bundle_error: None,
        };
        if self.config.load.bundle {
            // 先填入路徑，讓 zip 內的 summary.json 與磁碟上的一致
            summary.bundle = Some(self.storage.full_path(BUNDLE_OUTPUT));
            if let Err(e) = self.write_bundle(&summary).await {
                tracing::error!("❌ Bundle failed: {}", e);
                summary.bundle = None;
                summary.bundle_error = Some(e.user_friendly_message());
            }
        }
        write_json(&self.storage, SUMMARY_OUTPUT, &summary).await?;

        let failed = summary.failed_views().count();
        tracing::info!(
            "✅ {} of {} views built",
            summary.views.len() - failed,
            summary.views.len()
        );
        Ok(summary)
    }

    async fn write_bundle(&self, summary: &RunSummary) -> Result<()> {
        let mut files = Vec::new();
        for name in summary.views.iter().flat_map(|v| v.files.iter()) {
            files.push((name.clone(), self.storage.read_file(name).await?));
        }
        let summary_bytes = serde_json::to_vec_pretty(summary)?;
        files.push((SUMMARY_OUTPUT.to_string(), summary_bytes));

        let zip_data = build_zip(&files)?;
        tracing::debug!("Writing bundle ({} bytes, {} files)", zip_data.len(), files.len());
        self.storage.write_file(BUNDLE_OUTPUT, &zip_data).await
    }
}

fn build_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DashboardError;
    use std::io::Read;
    use tempfile::TempDir;

    fn dashboard_in(dir: &TempDir) -> Dashboard {
        let mut config = DashboardConfig::default();
        config.load.output_path = dir.path().to_str().unwrap().to_string();
        Dashboard::new(config).unwrap()
    }

    fn house_ok() -> ViewOutcome {
        ViewOutcome::from_result(&View::House, Ok("house.json".to_string()))
    }

    #[tokio::test]
    async fn test_bundle_failure_still_writes_summary() {
        let dir = TempDir::new().unwrap();
        let dashboard = dashboard_in(&dir);

        // house.json was never written, so the bundle cannot be built
        let summary = dashboard.finish_run(vec![house_ok()]).await.unwrap();

        assert!(summary.bundle.is_none());
        assert!(summary.bundle_error.is_some());
        assert!(!dir.path().join(BUNDLE_OUTPUT).exists());

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(SUMMARY_OUTPUT)).unwrap()).unwrap();
        assert_eq!(written["views"][0]["status"], serde_json::json!("ok"));
        assert!(written["bundle_error"].is_string());
        assert!(written.get("bundle").is_none());
    }

    #[tokio::test]
    async fn test_bundled_summary_names_the_bundle() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("house.json"), b"{}").unwrap();
        let dashboard = dashboard_in(&dir);

        let summary = dashboard.finish_run(vec![house_ok()]).await.unwrap();
        let bundle_path = summary.bundle.clone().unwrap();
        assert!(bundle_path.ends_with(BUNDLE_OUTPUT));

        let bytes = std::fs::read(dir.path().join(BUNDLE_OUTPUT)).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut inner = String::new();
        archive
            .by_name(SUMMARY_OUTPUT)
            .unwrap()
            .read_to_string(&mut inner)
            .unwrap();
        let inner: serde_json::Value = serde_json::from_str(&inner).unwrap();
        assert_eq!(inner["bundle"], serde_json::json!(bundle_path));
    }

    #[test]
    fn test_stock_output_files_follow_symbol() {
        let view = View::Stock {
            symbol: Some(" aapl ".to_string()),
        };
        assert_eq!(view.output_files(), vec!["stock_AAPL.json"]);
        assert!(View::Stock { symbol: None }.output_files().is_empty());
    }

    #[test]
    fn test_outcome_from_error_carries_status() {
        let outcome = ViewOutcome::from_result(
            &View::Stock { symbol: None },
            Err(DashboardError::MissingSymbol),
        );
        assert!(!outcome.is_ok());
        assert_eq!(outcome.status_code, Some(400));
        assert_eq!(outcome.error.as_deref(), Some("No symbol provided"));
        assert!(outcome.files.is_empty());
    }

    #[test]
    fn test_build_zip() {
        let files = vec![
            ("house.json".to_string(), b"{}".to_vec()),
            ("summary.json".to_string(), b"{}".to_vec()),
        ];
        let bytes = build_zip(&files).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
