use crate::domain::model::{
    ChoroplethStyle, DistrictFeature, DistrictId, DistrictResult, Feature, ResultRecord,
    WinnerAnnotation,
};
use crate::core::stock::parse_number;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const REPUBLICAN_RED: &str = "#EF4444";
pub const DEMOCRAT_BLUE: &str = "#3B82F6";
pub const NEUTRAL_GRAY: &str = "#ccc";
const BORDER_COLOR: &str = "#222";
const BORDER_WEIGHT: f64 = 0.5;

/// Normalizes raw result rows, dropping (and counting) the unusable ones.
pub fn normalize_results(records: &[ResultRecord]) -> Vec<DistrictResult> {
    let results: Vec<DistrictResult> = records
        .iter()
        .filter_map(DistrictResult::from_record)
        .collect();

    let dropped = records.len() - results.len();
    if dropped > 0 {
        tracing::warn!(
            "⚠️ Dropped {} result rows without a district id or percentage",
            dropped
        );
    }
    results
}

/// 每個選區保留得票率最高的紀錄；同分時保留先出現者
pub fn best_by_district(results: &[DistrictResult]) -> HashMap<&DistrictId, &DistrictResult> {
    let mut winners: HashMap<&DistrictId, &DistrictResult> = HashMap::new();
    for result in results {
        winners
            .entry(&result.district)
            .and_modify(|best| {
                if result.pct > best.pct {
                    *best = result;
                }
            })
            .or_insert(result);
    }
    winners
}

pub struct ResultsMerger<'a> {
    winners: HashMap<&'a DistrictId, &'a DistrictResult>,
}

impl<'a> ResultsMerger<'a> {
    pub fn new(results: &'a [DistrictResult]) -> Self {
        Self {
            winners: best_by_district(results),
        }
    }

    pub fn district_count(&self) -> usize {
        self.winners.len()
    }

    pub fn winner(&self, district: Option<&DistrictId>) -> WinnerAnnotation {
        district
            .and_then(|id| self.winners.get(id))
            .map(|best| WinnerAnnotation {
                party: best.party.clone(),
                pct: best.pct,
            })
            .unwrap_or_default()
    }

    /// Returns new features carrying `winnerParty` and `winnerPct`.
    pub fn merge(&self, features: &[DistrictFeature]) -> Vec<Feature> {
        features
            .iter()
            .map(|df| {
                let winner = self.winner(df.district.as_ref());
                let mut feature = df.feature.clone();
                annotate(&mut feature.properties, &winner);
                feature
            })
            .collect()
    }
}

/// One-shot form of [`ResultsMerger::merge`].
pub fn merge(features: &[DistrictFeature], results: &[DistrictResult]) -> Vec<Feature> {
    ResultsMerger::new(results).merge(features)
}

fn annotate(properties: &mut Map<String, Value>, winner: &WinnerAnnotation) {
    properties.insert(
        "winnerParty".to_string(),
        winner
            .party
            .as_ref()
            .map_or(Value::Null, |p| Value::String(p.clone())),
    );
    properties.insert("winnerPct".to_string(), Value::from(winner.pct));
}

fn style(fill_color: &str, pct: f64) -> ChoroplethStyle {
    ChoroplethStyle {
        fill_color: fill_color.to_string(),
        fill_opacity: pct / 100.0,
        color: BORDER_COLOR.to_string(),
        weight: BORDER_WEIGHT,
    }
}

pub fn house_style(properties: &Map<String, Value>) -> ChoroplethStyle {
    let fill = match properties.get("winnerParty").and_then(Value::as_str) {
        Some("R") => REPUBLICAN_RED,
        Some("D") => DEMOCRAT_BLUE,
        _ => NEUTRAL_GRAY,
    };
    let pct = parse_number(properties.get("winnerPct")).unwrap_or(0.0);
    style(fill, pct)
}

/// Senate file arrives already merged, so only the colour mapping applies.
pub fn senate_style(properties: &Map<String, Value>) -> ChoroplethStyle {
    let fill = match properties.get("party_simplified").and_then(Value::as_str) {
        Some("REPUBLICAN") => REPUBLICAN_RED,
        Some("DEMOCRAT") => DEMOCRAT_BLUE,
        _ => NEUTRAL_GRAY,
    };
    let pct = parse_number(properties.get("vote_pct")).unwrap_or(0.0);
    style(fill, pct)
}

pub fn apply_style<F>(features: &mut [Feature], style_fn: F)
where
    F: Fn(&Map<String, Value>) -> ChoroplethStyle,
{
    for feature in features {
        let style = style_fn(&feature.properties);
        match serde_json::to_value(style) {
            Ok(value) => {
                feature.properties.insert("style".to_string(), value);
            }
            Err(e) => tracing::warn!("Could not serialize style: {}", e),
        }
    }
}
