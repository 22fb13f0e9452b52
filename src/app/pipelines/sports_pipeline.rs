use crate::adapters::{read_json, SportsApi};
use crate::app::pipelines::write_json;
use crate::core::sports;
use crate::core::{DataSource, Pipeline, Storage};
use crate::domain::sports::{
    ApiGame, ApiPlayer, ConferenceGames, PlayerLine, PlayerStats, SeasonAverage, ShotChartView,
    ShotRecord, UpcomingGame,
};
use crate::utils::error::Result;
use std::collections::BTreeMap;

pub const GAMES_OUTPUT: &str = "games.json";
pub const PLAYERS_OUTPUT: &str = "players.json";
pub const SHOTS_OUTPUT: &str = "shots.json";

pub struct GamesPipeline<S: Storage> {
    api: SportsApi,
    storage: S,
    season: u16,
    per_page: u32,
}

impl<S: Storage> GamesPipeline<S> {
    pub fn new(api: SportsApi, storage: S, season: u16, per_page: u32) -> Self {
        Self {
            api,
            storage,
            season,
            per_page,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for GamesPipeline<S> {
    type Raw = Vec<ApiGame>;
    type Output = ConferenceGames;

    fn name(&self) -> &str {
        "games"
    }

    async fn extract(&self) -> Result<Vec<ApiGame>> {
        let games = self.api.games(self.season, self.per_page).await?;
        tracing::info!("Fetched {} games for season {}", games.len(), self.season);
        Ok(games)
    }

    async fn transform(&self, raw: Vec<ApiGame>) -> Result<ConferenceGames> {
        let summaries = raw.iter().map(sports::summarize_game).collect();
        let split = sports::split_by_conference(summaries);
        tracing::debug!("East: {}, West: {}", split.east.len(), split.west.len());
        Ok(split)
    }

    async fn load(&self, output: ConferenceGames) -> Result<String> {
        write_json(&self.storage, GAMES_OUTPUT, &output).await
    }
}

pub struct PlayersPipeline<S: Storage> {
    api: SportsApi,
    storage: S,
    season: u16,
    per_page: u32,
}

impl<S: Storage> PlayersPipeline<S> {
    pub fn new(api: SportsApi, storage: S, season: u16, per_page: u32) -> Self {
        Self {
            api,
            storage,
            season,
            per_page,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for PlayersPipeline<S> {
    type Raw = (Vec<ApiPlayer>, Vec<SeasonAverage>);
    type Output = Vec<PlayerLine>;

    fn name(&self) -> &str {
        "players"
    }

    async fn extract(&self) -> Result<(Vec<ApiPlayer>, Vec<SeasonAverage>)> {
        let players = self.api.players(self.per_page).await?;
        if players.is_empty() {
            tracing::warn!("⚠️ Player list is empty, skipping season averages");
            return Ok((players, Vec::new()));
        }

        // 平均數據需要先拿到球員 id
        let ids: Vec<i64> = players.iter().map(|p| p.id).collect();
        let averages = self.api.season_averages(self.season, &ids).await?;
        tracing::info!(
            "Fetched {} players and {} season averages",
            players.len(),
            averages.len()
        );
        Ok((players, averages))
    }

    async fn transform(&self, raw: (Vec<ApiPlayer>, Vec<SeasonAverage>)) -> Result<Vec<PlayerLine>> {
        let (players, averages) = raw;
        Ok(sports::merge_player_lines(&players, &averages))
    }

    async fn load(&self, output: Vec<PlayerLine>) -> Result<String> {
        write_json(&self.storage, PLAYERS_OUTPUT, &output).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShotChartInputs {
    pub shots: Vec<ShotRecord>,
    pub stats: BTreeMap<String, PlayerStats>,
    pub upcoming_games: Vec<UpcomingGame>,
}

#[derive(Debug, Clone)]
pub struct ShotChartFiles {
    pub shots: String,
    pub player_stats: String,
    pub upcoming_games: String,
}

pub struct ShotChartPipeline<D: DataSource, S: Storage> {
    data: D,
    storage: S,
    files: ShotChartFiles,
}

impl<D: DataSource, S: Storage> ShotChartPipeline<D, S> {
    pub fn new(data: D, storage: S, files: ShotChartFiles) -> Self {
        Self {
            data,
            storage,
            files,
        }
    }
}

#[async_trait::async_trait]
impl<D: DataSource, S: Storage> Pipeline for ShotChartPipeline<D, S> {
    type Raw = ShotChartInputs;
    type Output = ShotChartView;

    fn name(&self) -> &str {
        "shots"
    }

    async fn extract(&self) -> Result<ShotChartInputs> {
        let (shots, stats, upcoming) = tokio::join!(
            read_json::<Vec<ShotRecord>, _>(&self.data, &self.files.shots),
            read_json::<BTreeMap<String, PlayerStats>, _>(&self.data, &self.files.player_stats),
            read_json::<Vec<UpcomingGame>, _>(&self.data, &self.files.upcoming_games),
        );

        // 賽程只是附加資訊，讀取失敗時留空
        let upcoming_games = upcoming.unwrap_or_else(|e| {
            tracing::warn!("⚠️ Upcoming games unavailable: {}", e);
            Vec::new()
        });

        Ok(ShotChartInputs {
            shots: shots?,
            stats: stats?,
            upcoming_games,
        })
    }

    async fn transform(&self, raw: ShotChartInputs) -> Result<ShotChartView> {
        let players = sports::selectable_players(&raw.shots, &raw.stats);
        let default_player = sports::default_player(&players);
        let summaries = sports::summaries_by_player(&raw.shots, &players);
        let shots = sports::shots_by_player(&raw.shots, &players);

        let mut stats = raw.stats;
        stats.retain(|name, _| players.contains(name));

        Ok(ShotChartView {
            players,
            default_player,
            summaries,
            shots,
            stats,
            upcoming_games: raw.upcoming_games,
        })
    }

    async fn load(&self, output: ShotChartView) -> Result<String> {
        write_json(&self.storage, SHOTS_OUTPUT, &output).await
    }
}
