use crate::core::DataSource;
use crate::domain::sports::{ApiGame, ApiPlayer, Page, SeasonAverage};
use crate::utils::error::{DashboardError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// `base` + `path`, then the query pairs, percent-encoded.
pub fn endpoint(base: &str, path: &str, query: &[(&str, String)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|e| DashboardError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: joined.clone(),
        reason: e.to_string(),
    })?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

async fn get_bytes(client: &Client, url: Url) -> Result<Vec<u8>> {
    tracing::debug!("Making API request to: {}", redact(&url));
    let response = client.get(url.clone()).send().await?;
    tracing::debug!("API response status: {}", response.status());

    if !response.status().is_success() {
        return Err(DashboardError::UpstreamStatus {
            url: redact(&url),
            status: response.status().as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

pub async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T> {
    let bytes = get_bytes(client, url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Strips the API key before a URL reaches logs or error messages.
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return clean.to_string();
    }
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

/// balldontlie 相容的球賽 API
#[derive(Debug, Clone)]
pub struct SportsApi {
    client: Client,
    base_url: String,
}

impl SportsApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn games(&self, season: u16, per_page: u32) -> Result<Vec<ApiGame>> {
        let url = endpoint(
            &self.base_url,
            "games",
            &[
                ("seasons[]", season.to_string()),
                ("per_page", per_page.to_string()),
            ],
        )?;
        let page: Page<ApiGame> = get_json(&self.client, url).await?;
        Ok(page.data)
    }

    pub async fn players(&self, per_page: u32) -> Result<Vec<ApiPlayer>> {
        let url = endpoint(&self.base_url, "players", &[("per_page", per_page.to_string())])?;
        let page: Page<ApiPlayer> = get_json(&self.client, url).await?;
        Ok(page.data)
    }

    pub async fn season_averages(&self, season: u16, player_ids: &[i64]) -> Result<Vec<SeasonAverage>> {
        let mut query = vec![("season", season.to_string())];
        query.extend(player_ids.iter().map(|id| ("player_ids[]", id.to_string())));
        let url = endpoint(&self.base_url, "season_averages", &query)?;
        let page: Page<SeasonAverage> = get_json(&self.client, url).await?;
        Ok(page.data)
    }
}

/// Alpha Vantage 相容的股價 API
#[derive(Debug, Clone)]
pub struct MarketApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MarketApi {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn query(&self, function: &str, symbol: &str, extra: &[(&str, String)]) -> Result<Value> {
        let api_key = crate::utils::validation::validate_required_field("sources.api_key", &self.api_key)?;
        let mut query = vec![
            ("function", function.to_string()),
            ("symbol", symbol.to_string()),
        ];
        query.extend(extra.iter().cloned());
        query.push(("apikey", api_key.clone()));

        let url = endpoint(&self.base_url, "query", &query)?;
        get_json(&self.client, url).await
    }

    pub async fn overview(&self, symbol: &str) -> Result<Value> {
        self.query("OVERVIEW", symbol, &[]).await
    }

    pub async fn global_quote(&self, symbol: &str) -> Result<Value> {
        self.query("GLOBAL_QUOTE", symbol, &[]).await
    }

    pub async fn daily_series(&self, symbol: &str) -> Result<Value> {
        self.query(
            "TIME_SERIES_DAILY",
            symbol,
            &[("outputsize", "compact".to_string())],
        )
        .await
    }

    pub async fn income_statement(&self, symbol: &str) -> Result<Value> {
        self.query("INCOME_STATEMENT", symbol, &[]).await
    }
}

/// Best-effort company logo lookup. Never fails; a miss is `None`.
#[derive(Debug, Clone)]
pub struct LogoLookup {
    client: Client,
    search_base_url: String,
    image_base_url: String,
}

impl LogoLookup {
    pub fn new(
        client: Client,
        search_base_url: impl Into<String>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            search_base_url: search_base_url.into(),
            image_base_url: image_base_url.into(),
        }
    }

    pub async fn logo_url(&self, company: &str) -> Option<String> {
        match self.try_logo_url(company).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Logo lookup for '{}' failed: {}", company, e);
                None
            }
        }
    }

    async fn try_logo_url(&self, company: &str) -> Result<Option<String>> {
        let url = endpoint(
            &self.search_base_url,
            "v1/companies/suggest",
            &[("query", company.to_string())],
        )?;
        let suggestions: Value = get_json(&self.client, url).await?;

        let domain = suggestions
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("domain"))
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty());

        Ok(domain.map(|d| format!("{}/{}", self.image_base_url.trim_end_matches('/'), d)))
    }
}

/// Static data files served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl DataSource for HttpDataSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = endpoint(&self.base_url, name, &[])?;
        get_bytes(&self.client, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client() -> Client {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let url = endpoint(
            "https://example.com/api/v1/",
            "/games",
            &[("seasons[]", "2024".to_string())],
        )
        .unwrap();
        assert_eq!(url.path(), "/api/v1/games");
        assert_eq!(url.query(), Some("seasons%5B%5D=2024"));
    }

    #[test]
    fn test_redact_hides_api_key() {
        let url = Url::parse("https://example.com/query?function=OVERVIEW&apikey=secret").unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("function=OVERVIEW"));
    }

    #[tokio::test]
    async fn test_games_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/games")
                .query_param("seasons[]", "2024")
                .query_param("per_page", "100");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"data": [{
                    "home_team": {"abbreviation": "BOS"},
                    "visitor_team": {"abbreviation": "LAL"},
                    "home_team_score": 101,
                    "visitor_team_score": 99,
                    "status": "Final"
                }]}));
        });

        let api = SportsApi::new(client(), server.base_url());
        let games = api.games(2024, 100).await.unwrap();

        api_mock.assert();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team.abbreviation, "BOS");
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/players");
            then.status(503);
        });

        let api = SportsApi::new(client(), server.base_url());
        let err = api.players(100).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, DashboardError::UpstreamStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_market_query_requires_api_key() {
        let api = MarketApi::new(client(), "http://127.0.0.1:9", None);
        let err = api.overview("IBM").await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingConfigError { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_logo_lookup() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/companies/suggest")
                .query_param("query", "Apple");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([{"name": "Apple", "domain": "apple.com"}]));
        });

        let lookup = LogoLookup::new(client(), server.base_url(), "https://logo.clearbit.com");
        let url = lookup.logo_url("Apple").await;

        api_mock.assert();
        assert_eq!(url.as_deref(), Some("https://logo.clearbit.com/apple.com"));
    }

    #[tokio::test]
    async fn test_logo_lookup_failure_is_swallowed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/companies/suggest");
            then.status(500);
        });

        let lookup = LogoLookup::new(client(), server.base_url(), "https://logo.clearbit.com");
        assert_eq!(lookup.logo_url("Apple").await, None);
    }

    #[tokio::test]
    async fn test_logo_lookup_without_suggestions() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/companies/suggest");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!([]));
        });

        let lookup = LogoLookup::new(client(), server.base_url(), "https://logo.clearbit.com");
        assert_eq!(lookup.logo_url("Nobody").await, None);
    }
}
