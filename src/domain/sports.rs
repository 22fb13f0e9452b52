use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// balldontlie 分頁回應
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTeam {
    pub abbreviation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGame {
    pub home_team: ApiTeam,
    #[serde(alias = "visitor_team")]
    pub away_team: ApiTeam,
    #[serde(default)]
    pub home_team_score: i64,
    #[serde(default, alias = "visitor_team_score")]
    pub away_team_score: i64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub home_team: String,
    pub away_team: String,
    pub home_team_score: i64,
    pub away_team_score: i64,
    #[serde(rename = "gameStatusText")]
    pub game_status_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conference {
    East,
    West,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConferenceGames {
    pub east: Vec<GameSummary>,
    pub west: Vec<GameSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlayer {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonAverage {
    pub player_id: i64,
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub stl: Option<f64>,
    #[serde(default)]
    pub blk: Option<f64>,
    #[serde(default)]
    pub fg_pct: Option<f64>,
    #[serde(default)]
    pub fg3_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub player_id: i64,
    pub player_name: String,
    pub pts: Option<f64>,
    pub ast: Option<f64>,
    pub reb: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub ppg: Option<f64>,
    pub fgp: Option<String>,
    pub tpp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub player_name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub shot_made: u32,
    #[serde(default)]
    pub shot_attempted: u32,
}

/// `player_stats.json` 中每位球員的賽季資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PlayerStats {
    pub display_first_last: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg3_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ft_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcomingGame {
    pub game_id: String,
    pub date: String,
    pub time: String,
    pub visitor_team: String,
    pub home_team: String,
    pub arena: String,
    pub broadcaster: String,
    pub live_period: i64,
    pub live_period_bcast: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootingSummary {
    pub made: u32,
    pub attempted: u32,
    pub fg_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotChartView {
    pub players: Vec<String>,
    pub default_player: Option<String>,
    pub summaries: BTreeMap<String, ShootingSummary>,
    /// 每位球員的投籃點位，供 hexbin 繪製
    pub shots: BTreeMap<String, Vec<ShotRecord>>,
    pub stats: BTreeMap<String, PlayerStats>,
    pub upcoming_games: Vec<UpcomingGame>,
}
