use crate::domain::sports::{
    ApiGame, ApiPlayer, Conference, ConferenceGames, GameSummary, PlayerLine, PlayerStats,
    SeasonAverage, ShootingSummary, ShotRecord,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Eastern Conference team abbreviations.
pub const EAST_TEAMS: [&str; 10] = [
    "BOS", "BRK", "NYK", "PHI", "TOR", "CHI", "CLE", "DET", "IND", "MIL",
];

pub const FEATURED_PLAYER: &str = "Stephen Curry";

pub fn summarize_game(game: &ApiGame) -> GameSummary {
    GameSummary {
        home_team: game.home_team.abbreviation.clone(),
        away_team: game.away_team.abbreviation.clone(),
        home_team_score: game.home_team_score,
        away_team_score: game.away_team_score,
        game_status_text: game.status.clone(),
    }
}

/// 任一隊屬於東區即歸為東區
pub fn conference_of(game: &GameSummary) -> Conference {
    let is_east = |abbr: &str| EAST_TEAMS.contains(&abbr);
    if is_east(game.home_team.as_str()) || is_east(game.away_team.as_str()) {
        Conference::East
    } else {
        Conference::West
    }
}

pub fn split_by_conference(games: Vec<GameSummary>) -> ConferenceGames {
    let (east, west): (Vec<_>, Vec<_>) = games
        .into_iter()
        .partition(|g| conference_of(g) == Conference::East);
    ConferenceGames { east, west }
}

fn percent_string(ratio: Option<f64>) -> Option<String> {
    ratio.map(|r| format!("{:.1}", r * 100.0))
}

/// Joins season averages to player names. Rows for unknown players are skipped.
pub fn merge_player_lines(players: &[ApiPlayer], averages: &[SeasonAverage]) -> Vec<PlayerLine> {
    let by_id: HashMap<i64, &ApiPlayer> = players.iter().map(|p| (p.id, p)).collect();

    averages
        .iter()
        .filter_map(|avg| {
            let Some(player) = by_id.get(&avg.player_id) else {
                tracing::warn!("Season average for unknown player id {}", avg.player_id);
                return None;
            };
            Some(PlayerLine {
                player_id: player.id,
                player_name: format!("{} {}", player.first_name, player.last_name),
                pts: avg.pts,
                ast: avg.ast,
                reb: avg.reb,
                stl: avg.stl,
                blk: avg.blk,
                ppg: avg.pts,
                fgp: percent_string(avg.fg_pct),
                tpp: percent_string(avg.fg3_pct),
            })
        })
        .collect()
}

/// Players that have both shot data and season stats, sorted by name.
pub fn selectable_players(
    shots: &[ShotRecord],
    stats: &BTreeMap<String, PlayerStats>,
) -> Vec<String> {
    let shot_names: BTreeSet<&str> = shots.iter().map(|s| s.player_name.as_str()).collect();
    // BTreeMap 的 key 已排序
    stats
        .keys()
        .filter(|name| shot_names.contains(name.as_str()))
        .cloned()
        .collect()
}

pub fn default_player(players: &[String]) -> Option<String> {
    players
        .iter()
        .find(|p| p.as_str() == FEATURED_PLAYER)
        .or_else(|| players.first())
        .cloned()
}

pub fn shooting_summary<'a, I>(shots: I) -> ShootingSummary
where
    I: IntoIterator<Item = &'a ShotRecord>,
{
    let (made, attempted) = shots.into_iter().fold((0u32, 0u32), |(m, a), s| {
        (m + s.shot_made, a + s.shot_attempted)
    });
    let fg_pct = if attempted > 0 {
        (f64::from(made) / f64::from(attempted) * 100.0).round() as u32
    } else {
        0
    };
    ShootingSummary {
        made,
        attempted,
        fg_pct,
    }
}

pub fn summaries_by_player(
    shots: &[ShotRecord],
    players: &[String],
) -> BTreeMap<String, ShootingSummary> {
    players
        .iter()
        .map(|name| {
            let summary = shooting_summary(shots.iter().filter(|s| &s.player_name == name));
            (name.clone(), summary)
        })
        .collect()
}

/// Shot locations for each selectable player, in file order.
pub fn shots_by_player(
    shots: &[ShotRecord],
    players: &[String],
) -> BTreeMap<String, Vec<ShotRecord>> {
    let mut grouped: BTreeMap<String, Vec<ShotRecord>> =
        players.iter().map(|name| (name.clone(), Vec::new())).collect();
    for shot in shots {
        if let Some(list) = grouped.get_mut(&shot.player_name) {
            list.push(shot.clone());
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(home: &str, away: &str) -> GameSummary {
        GameSummary {
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_team_score: 100,
            away_team_score: 98,
            game_status_text: "Final".to_string(),
        }
    }

    fn shot(name: &str, made: u32) -> ShotRecord {
        ShotRecord {
            player_name: name.to_string(),
            x: 0.0,
            y: 0.0,
            shot_made: made,
            shot_attempted: 1,
        }
    }

    fn stats(name: &str) -> PlayerStats {
        serde_json::from_value(json!({"DISPLAY_FIRST_LAST": name, "GP": 70, "PTS": 25.1}))
            .unwrap()
    }

    #[test]
    fn test_conference_eastern_when_either_team_is_east() {
        assert_eq!(conference_of(&game("BOS", "LAL")), Conference::East);
        assert_eq!(conference_of(&game("LAL", "MIL")), Conference::East);
    }

    #[test]
    fn test_conference_western_matchup() {
        assert_eq!(conference_of(&game("LAL", "GSW")), Conference::West);
    }

    #[test]
    fn test_split_by_conference() {
        let split = split_by_conference(vec![
            game("BOS", "NYK"),
            game("DEN", "PHX"),
            game("GSW", "TOR"),
        ]);
        assert_eq!(split.east.len(), 2);
        assert_eq!(split.west.len(), 1);
        assert_eq!(split.west[0].home_team, "DEN");
    }

    #[test]
    fn test_summarize_game_accepts_visitor_team() {
        let raw: ApiGame = serde_json::from_value(json!({
            "home_team": {"abbreviation": "CHI"},
            "visitor_team": {"abbreviation": "DAL"},
            "home_team_score": 110,
            "visitor_team_score": 105,
            "status": "Final"
        }))
        .unwrap();
        let summary = summarize_game(&raw);
        assert_eq!(summary.away_team, "DAL");
        assert_eq!(summary.away_team_score, 105);
        assert_eq!(summary.game_status_text, "Final");
    }

    #[test]
    fn test_merge_player_lines() {
        let players: Vec<ApiPlayer> = serde_json::from_value(json!([
            {"id": 1, "first_name": "Jayson", "last_name": "Tatum"},
            {"id": 2, "first_name": "Luka", "last_name": "Doncic"}
        ]))
        .unwrap();
        let averages: Vec<SeasonAverage> = serde_json::from_value(json!([
            {"player_id": 2, "pts": 28.1, "ast": 8.0, "reb": 8.3, "stl": 1.4, "blk": 0.5,
             "fg_pct": 0.4567, "fg3_pct": 0.35},
            {"player_id": 99, "pts": 1.0}
        ]))
        .unwrap();

        let lines = merge_player_lines(&players, &averages);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].player_name, "Luka Doncic");
        assert_eq!(lines[0].ppg, Some(28.1));
        assert_eq!(lines[0].fgp.as_deref(), Some("45.7"));
        assert_eq!(lines[0].tpp.as_deref(), Some("35.0"));
    }

    #[test]
    fn test_selectable_players_and_default() {
        let shots = vec![shot("Stephen Curry", 1), shot("Anthony Edwards", 0)];
        let mut map = BTreeMap::new();
        map.insert("Stephen Curry".to_string(), stats("Stephen Curry"));
        map.insert("Anthony Edwards".to_string(), stats("Anthony Edwards"));
        map.insert("No Shots".to_string(), stats("No Shots"));

        let players = selectable_players(&shots, &map);
        assert_eq!(players, vec!["Anthony Edwards", "Stephen Curry"]);
        assert_eq!(default_player(&players).as_deref(), Some("Stephen Curry"));

        let others = vec!["Anthony Edwards".to_string()];
        assert_eq!(default_player(&others).as_deref(), Some("Anthony Edwards"));
        assert_eq!(default_player(&[]), None);
    }

    #[test]
    fn test_shooting_summary() {
        let shots = vec![shot("A", 1), shot("A", 0), shot("A", 1)];
        let summary = shooting_summary(&shots);
        assert_eq!(summary.made, 2);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.fg_pct, 67);

        assert_eq!(shooting_summary(&Vec::<ShotRecord>::new()).fg_pct, 0);
    }

    #[test]
    fn test_shots_by_player_keeps_only_selectable() {
        let mut first = shot("Stephen Curry", 1);
        first.x = 1.0;
        first.y = 20.0;
        let shots = vec![first.clone(), shot("Bench Player", 1), shot("Stephen Curry", 0)];
        let players = vec!["Stephen Curry".to_string()];

        let grouped = shots_by_player(&shots, &players);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["Stephen Curry"].len(), 2);
        assert_eq!(grouped["Stephen Curry"][0], first);
        assert!(!grouped.contains_key("Bench Player"));
    }
}
