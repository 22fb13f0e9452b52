use crate::config::toml_config::DashboardConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "dashboard-etl")]
#[command(about = "Builds the JSON payloads behind the sports, stock, election and healthcare dashboards")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory or base URL holding the static data files
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub season: Option<u16>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: ViewCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ViewCommand {
    /// House map: district boundaries merged with election results
    House,
    /// Senate map: pre-merged state results
    Senate,
    /// Season games split by conference
    Games,
    /// Player season averages
    Players,
    /// Shot chart player list, summaries and upcoming games
    Shots,
    /// Stock report for one ticker
    Stock {
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Healthcare premium statistics
    Health,
    /// Every view, plus a run summary and a zip bundle
    All {
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

impl CliConfig {
    /// TOML 設定 (若有) 加上命令列覆蓋值
    pub fn resolve(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                DashboardConfig::from_file(path)?
            }
            None => DashboardConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data.location = dir.clone();
        }
        if let Some(path) = &self.output_path {
            config.load.output_path = path.clone();
        }
        if let Some(season) = self.season {
            config.sports.season = season;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        Ok(config)
    }
}
