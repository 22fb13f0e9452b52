use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// GeoJSON feature。geometry 不解析，原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 正規化後的選區代碼
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DistrictId(String);

impl DistrictId {
    /// Property keys checked on a boundary feature, highest priority first.
    pub const PROPERTY_KEYS: [&'static str; 3] = ["GEOID", "geoid", "GEOID20"];

    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Accepts a string or an integral number. Anything else is unusable.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0)
                        .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                        .map(|f| Self(format!("{}", f as i64)))
                }
            }
            _ => None,
        }
    }

    pub fn from_properties(properties: &Map<String, Value>) -> Option<Self> {
        Self::PROPERTY_KEYS
            .iter()
            .filter_map(|key| properties.get(*key))
            .find_map(Self::from_value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `election_results.json` 的原始資料列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "GeoID", default)]
    pub geo_id: Value,
    #[serde(rename = "Party", default)]
    pub party: Option<String>,
    #[serde(rename = "%", default)]
    pub pct: Option<f64>,
}

/// A result row whose district identifier has been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictResult {
    pub district: DistrictId,
    pub party: Option<String>,
    pub pct: f64,
}

impl DistrictResult {
    /// Rows without a usable identifier or percentage are dropped.
    pub fn from_record(record: &ResultRecord) -> Option<Self> {
        let district = DistrictId::from_value(&record.geo_id)?;
        let pct = record.pct.filter(|p| p.is_finite())?;
        Some(Self {
            district,
            party: record.party.clone(),
            pct,
        })
    }
}

/// A boundary feature paired with its identifier, resolved once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictFeature {
    pub district: Option<DistrictId>,
    pub feature: Feature,
}

impl From<Feature> for DistrictFeature {
    fn from(feature: Feature) -> Self {
        Self {
            district: DistrictId::from_properties(&feature.properties),
            feature,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinnerAnnotation {
    pub party: Option<String>,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub color: String,
    pub weight: f64,
}
