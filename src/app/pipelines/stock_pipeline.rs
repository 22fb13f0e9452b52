use crate::adapters::{LogoLookup, MarketApi};
use crate::app::pipelines::write_json;
use crate::core::stock;
use crate::core::{Pipeline, Storage};
use crate::domain::market::{MarketPayloads, StockReport};
use crate::utils::error::{DashboardError, Result};

pub struct StockPipeline<S: Storage> {
    market: MarketApi,
    logos: LogoLookup,
    storage: S,
    symbol: Option<String>,
}

impl<S: Storage> StockPipeline<S> {
    pub fn new(market: MarketApi, logos: LogoLookup, storage: S, symbol: Option<String>) -> Self {
        Self {
            market,
            logos,
            storage,
            symbol,
        }
    }

    /// 股票代號：去除空白並轉大寫；空值視為未提供
    pub fn symbol(&self) -> Result<String> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .ok_or(DashboardError::MissingSymbol)
    }

    pub fn output_name(symbol: &str) -> String {
        format!("stock_{}.json", symbol)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for StockPipeline<S> {
    type Raw = MarketPayloads;
    type Output = StockReport;

    fn name(&self) -> &str {
        "stock"
    }

    async fn extract(&self) -> Result<MarketPayloads> {
        let symbol = self.symbol()?;

        // OVERVIEW 先行：沒有公司名稱就不必再打其他 API
        let overview = self.market.overview(&symbol).await?;
        let name = stock::company_name(&symbol, &overview)?;
        let logo_url = self
            .logos
            .logo_url(&stock::strip_corporate_suffix(name))
            .await;

        let (quote, daily, income) = tokio::try_join!(
            self.market.global_quote(&symbol),
            self.market.daily_series(&symbol),
            self.market.income_statement(&symbol),
        )?;

        Ok(MarketPayloads {
            symbol,
            overview,
            quote,
            daily,
            income,
            logo_url,
        })
    }

    async fn transform(&self, raw: MarketPayloads) -> Result<StockReport> {
        let report = stock::assemble_report(raw)?;
        tracing::debug!(
            "Stock report: {} daily bars, {} quarters",
            report.time_series.len(),
            report.quarterly_financials.len()
        );
        Ok(report)
    }

    async fn load(&self, output: StockReport) -> Result<String> {
        let symbol = self.symbol()?;
        write_json(&self.storage, &Self::output_name(&symbol), &output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::build_client;
    use crate::app::pipelines::test_support::MockStorage;
    use crate::core::etl::EtlEngine;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn pipeline(server: &MockServer, out: MockStorage, symbol: Option<&str>) -> StockPipeline<MockStorage> {
        let client = build_client(Duration::from_secs(5)).unwrap();
        StockPipeline::new(
            MarketApi::new(client.clone(), server.base_url(), Some("demo".to_string())),
            LogoLookup::new(client, server.base_url(), "https://logo.clearbit.com"),
            out,
            symbol.map(str::to_string),
        )
    }

    fn mock_function(server: &MockServer, function: &str, body: serde_json::Value) {
        let function = function.to_string();
        server.mock(move |when, then| {
            when.method(GET)
                .path("/query")
                .query_param("function", &function)
                .query_param("symbol", "IBM")
                .query_param("apikey", "demo");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        });
    }

    #[tokio::test]
    async fn test_stock_pipeline_end_to_end() {
        let server = MockServer::start();
        mock_function(&server, "OVERVIEW", json!({"Symbol": "IBM", "Name": "International Business Machines Corp"}));
        mock_function(&server, "GLOBAL_QUOTE", json!({"Global Quote": {"05. price": "170.10"}}));
        mock_function(&server, "TIME_SERIES_DAILY", json!({"Time Series (Daily)": {
            "2024-05-02": {"1. open": "10", "2. high": "12", "3. low": "9", "4. close": "11", "5. volume": "1000"}
        }}));
        mock_function(&server, "INCOME_STATEMENT", json!({"quarterlyReports": [
            {"fiscalDateEnding": "2024-03-31", "ebitda": "100", "totalRevenue": "500", "grossProfit": "250", "netIncome": "50"}
        ]}));
        let logo_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/companies/suggest")
                .query_param("query", "International Business Machines");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"domain": "ibm.com"}]));
        });

        let out = MockStorage::new();
        let path = EtlEngine::new(pipeline(&server, out.clone(), Some(" ibm ")))
            .run()
            .await
            .unwrap();

        logo_mock.assert();
        assert_eq!(path, "test_output/stock_IBM.json");
        let written = out.get_json("stock_IBM.json").await.unwrap();
        assert_eq!(written["overview"]["Symbol"], json!("IBM"));
        assert_eq!(written["logoUrl"], json!("https://logo.clearbit.com/ibm.com"));
        assert_eq!(written["timeSeries"][0]["close"], json!(11.0));
        assert_eq!(written["quarterlyFinancials"][0]["EBITDA"], json!(100.0));
    }

    #[tokio::test]
    async fn test_invalid_symbol_stops_after_overview() {
        let server = MockServer::start();
        mock_function(&server, "OVERVIEW", json!({}));
        let quote_mock = server.mock(|when, then| {
            when.method(GET).path("/query").query_param("function", "GLOBAL_QUOTE");
            then.status(200).json_body(json!({}));
        });

        let err = pipeline(&server, MockStorage::new(), Some("IBM"))
            .extract()
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::InvalidSymbol { .. }));
        assert_eq!(err.status_code(), 400);
        quote_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_missing_financials_after_logo_failure() {
        let server = MockServer::start();
        mock_function(&server, "OVERVIEW", json!({"Name": "International Business Machines"}));
        mock_function(&server, "GLOBAL_QUOTE", json!({}));
        mock_function(&server, "TIME_SERIES_DAILY", json!({}));
        mock_function(&server, "INCOME_STATEMENT", json!({"Information": "rate limited"}));
        server.mock(|when, then| {
            when.method(GET).path("/v1/companies/suggest");
            then.status(500);
        });

        let out = MockStorage::new();
        let err = EtlEngine::new(pipeline(&server, out.clone(), Some("IBM")))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::FinancialsUnavailable { .. }));
        assert!(!out.contains("stock_IBM.json").await);
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let server = MockServer::start();
        let err = pipeline(&server, MockStorage::new(), Some("  "))
            .extract()
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingSymbol));
    }
}
