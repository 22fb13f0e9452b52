use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `clean_data.json` 的 tidy 格式資料列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
    #[serde(rename = "Location")]
    pub location: String,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub location: String,
    pub cells: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthView {
    pub locations: Vec<String>,
    pub years: Vec<i32>,
    /// `{year, <Location>: value, ...}` rows, ascending by year.
    pub series: Vec<Map<String, Value>>,
    /// Location × year table, `"-"` where no value exists.
    pub pivot: Vec<Map<String, Value>>,
}
