use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourcesConfig,
    pub data: DataConfig,
    pub sports: SportsConfig,
    pub load: LoadConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub sports_base_url: String,
    pub market_base_url: String,
    pub logo_search_base_url: String,
    pub logo_image_base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            sports_base_url: "https://www.balldontlie.io/api/v1".to_string(),
            market_base_url: "https://www.alphavantage.co".to_string(),
            logo_search_base_url: "https://autocomplete.clearbit.com".to_string(),
            logo_image_base_url: "https://logo.clearbit.com".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

/// 靜態資料檔的位置 (本機目錄或 base URL) 與檔名
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub location: String,
    pub house_boundaries: String,
    pub house_results: String,
    pub senate: String,
    pub shots: String,
    pub player_stats: String,
    pub upcoming_games: String,
    pub health: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            location: "./public/data".to_string(),
            house_boundaries: "congress.geojson".to_string(),
            house_results: "election_results.json".to_string(),
            senate: "us_states_senate_merged.geojson".to_string(),
            shots: "all_shot_data.json".to_string(),
            player_stats: "player_stats.json".to_string(),
            upcoming_games: "upcoming_games.json".to_string(),
            health: "clean_data.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    fn file_names(&self) -> [(&'static str, &str); 7] {
        [
            ("data.house_boundaries", self.house_boundaries.as_str()),
            ("data.house_results", self.house_results.as_str()),
            ("data.senate", self.senate.as_str()),
            ("data.shots", self.shots.as_str()),
            ("data.player_stats", self.player_stats.as_str()),
            ("data.upcoming_games", self.upcoming_games.as_str()),
            ("data.health", self.health.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SportsConfig {
    pub season: u16,
    pub per_page: u32,
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            season: 2024,
            per_page: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub bundle: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            bundle: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        toml::from_str(&processed).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// API key from the file, falling back to `ALPHA_VANTAGE_API_KEY`.
    /// An unresolved `${VAR}` placeholder counts as unset.
    pub fn api_key(&self) -> Option<String> {
        self.sources
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
            .map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.timeout_seconds)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("sources.sports_base_url", &self.sources.sports_base_url)?;
        validation::validate_url("sources.market_base_url", &self.sources.market_base_url)?;
        validation::validate_url(
            "sources.logo_search_base_url",
            &self.sources.logo_search_base_url,
        )?;
        validation::validate_url(
            "sources.logo_image_base_url",
            &self.sources.logo_image_base_url,
        )?;
        validation::validate_range("sources.timeout_seconds", self.sources.timeout_seconds, 1, 600)?;

        if self.data.is_remote() {
            validation::validate_url("data.location", &self.data.location)?;
        } else {
            validation::validate_path("data.location", &self.data.location)?;
        }
        for (field, name) in self.data.file_names() {
            validation::validate_file_name(field, name)?;
        }

        validation::validate_range("sports.season", self.sports.season, 1946, 2100)?;
        validation::validate_range("sports.per_page", self.sports.per_page, 1, 100)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        Ok(())
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
