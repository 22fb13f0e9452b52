use crate::domain::market::{DailyBar, MarketPayloads, QuarterlyFinancial, StockReport};
use crate::utils::error::{DashboardError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const QUARTERS_SHOWN: usize = 5;

fn corporate_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i),?\s+(Inc\.?|Corporation|Corp\.?|LLC|Co\.?|Ltd\.?)$")
            .expect("corporate suffix pattern is valid")
    })
}

/// "Apple Inc." -> "Apple"，供 logo 查詢使用
pub fn strip_corporate_suffix(name: &str) -> String {
    corporate_suffix().replace(name, "").into_owned()
}

/// Company name from an OVERVIEW payload. Missing or empty means the symbol is unusable.
pub fn company_name<'a>(symbol: &str, overview: &'a Value) -> Result<&'a str> {
    overview
        .get("Name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DashboardError::InvalidSymbol {
            symbol: symbol.to_string(),
        })
}

/// Numbers or numeric strings ("52.0"); anything else is `None`.
pub(crate) fn parse_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn parse_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parses `Time Series (Daily)` into bars sorted by date ascending.
pub fn daily_series(payload: &Value) -> Vec<DailyBar> {
    let Some(series) = payload.get("Time Series (Daily)").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut bars: Vec<DailyBar> = series
        .iter()
        .map(|(date, vals)| DailyBar {
            date: date.clone(),
            open: parse_number(vals.get("1. open")),
            high: parse_number(vals.get("2. high")),
            low: parse_number(vals.get("3. low")),
            close: parse_number(vals.get("4. close")),
            volume: parse_integer(vals.get("5. volume")),
        })
        .collect();

    // ISO 日期字串可直接比較
    bars.sort_by(|a, b| a.date.cmp(&b.date));
    bars
}

/// Latest quarters from INCOME_STATEMENT, oldest first.
pub fn quarterly_financials(symbol: &str, payload: &Value) -> Result<Vec<QuarterlyFinancial>> {
    let reports = payload
        .get("quarterlyReports")
        .and_then(Value::as_array)
        .ok_or_else(|| DashboardError::FinancialsUnavailable {
            symbol: symbol.to_string(),
        })?;

    let mut quarters: Vec<QuarterlyFinancial> = reports
        .iter()
        .take(QUARTERS_SHOWN)
        .map(|report| QuarterlyFinancial {
            fiscal_date_ending: report
                .get("fiscalDateEnding")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            ebitda: parse_number(report.get("ebitda")),
            total_revenue: parse_number(report.get("totalRevenue")),
            gross_profit: parse_number(report.get("grossProfit")),
            net_income: parse_number(report.get("netIncome")),
        })
        .collect();
    quarters.reverse();
    Ok(quarters)
}

pub fn global_quote(payload: &Value) -> Value {
    payload
        .get("Global Quote")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

pub fn assemble_report(payloads: MarketPayloads) -> Result<StockReport> {
    company_name(&payloads.symbol, &payloads.overview)?;
    let quarterly_financials = quarterly_financials(&payloads.symbol, &payloads.income)?;

    let overview = match payloads.overview {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    Ok(StockReport {
        overview,
        quote: global_quote(&payloads.quote),
        time_series: daily_series(&payloads.daily),
        logo_url: payloads.logo_url,
        quarterly_financials,
    })
}
