use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFinancial {
    #[serde(rename = "fiscalDateEnding")]
    pub fiscal_date_ending: String,
    #[serde(rename = "EBITDA")]
    pub ebitda: Option<f64>,
    #[serde(rename = "totalRevenue")]
    pub total_revenue: Option<f64>,
    #[serde(rename = "grossProfit")]
    pub gross_profit: Option<f64>,
    #[serde(rename = "netIncome")]
    pub net_income: Option<f64>,
}

/// 單一股票代號的合併回應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub overview: Map<String, Value>,
    pub quote: Value,
    pub time_series: Vec<DailyBar>,
    pub logo_url: Option<String>,
    pub quarterly_financials: Vec<QuarterlyFinancial>,
}

/// Raw upstream payloads for one symbol, before assembly.
#[derive(Debug, Clone, Default)]
pub struct MarketPayloads {
    pub symbol: String,
    pub overview: Value,
    pub quote: Value,
    pub daily: Value,
    pub income: Value,
    pub logo_url: Option<String>,
}
