use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{Client as HttpClient, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ApiError, Summary};

/// MyFinStocks price API client. Every request bypasses HTTP caches.
pub struct MyFinStocksClient {
    http_client: HttpClient,
    base_url: String,
}

impl MyFinStocksClient {
    const API_PREFIX: &'static str = "/api/v1";

    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .default_headers(Self::create_headers())
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Headers sent on every request
    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }

    fn parse_url(raw: &str) -> Result<Url, ApiError> {
        Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// GET `{base_url}{path}` and parse the JSON body as `T`.
    ///
    /// `path` is appended verbatim. A non-success status fails with
    /// `ApiError::Status` whose message is the raw body text.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = Self::parse_url(&format!("{}{}", self.base_url, path))?;
        self.fetch(url).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self.http_client.get(url.clone()).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// GET /api/v1/prices/{symbol}
    ///
    /// The symbol is sent as one escaped path segment, so `/`, `#` or `?`
    /// in it cannot change the route.
    pub async fn get_cached_price(&self, symbol: &str) -> Result<Summary, ApiError> {
        let mut url = Self::parse_url(&format!("{}{}/prices", self.base_url, Self::API_PREFIX))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot take a path", self.base_url)))?
            .push(symbol);

        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::myfinstocks::PriceValue;
    use crate::utils::test_server::{Route, TestServer};
    use serde_json::{json, Value};

    fn client(server: &TestServer) -> MyFinStocksClient {
        MyFinStocksClient::new(server.base_url.clone(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_non_success_error_message_is_body() {
        let server = TestServer::start(vec![Route::new(
            "/api/v1/prices/XYZ",
            404,
            r#"{"detail":"No price data found for XYZ"}"#,
        )])
        .await;

        let err = client(&server)
            .get_json::<Value>("/api/v1/prices/XYZ")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), r#"{"detail":"No price data found for XYZ"}"#);
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept_verbatim() {
        let server = TestServer::start(vec![Route::new("/boom", 500, "Internal Server Error")]).await;

        let err = client(&server).get_json::<Value>("/boom").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_success_returns_parsed_body_unchanged() {
        let body = json!({
            "symbol": "RELIANCE",
            "live_price": "2850.50",
            "nested": {"points": [1, 2, 3]},
            "flag": true
        });
        let server = TestServer::start(vec![Route::new("/echo", 200, &body.to_string())]).await;

        let parsed: Value = client(&server).get_json("/echo").await.unwrap();
        assert_eq!(parsed, body);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_deserialization_error() {
        let server = TestServer::start(vec![Route::new("/bad", 200, "{not json")]).await;

        let err = client(&server).get_json::<Value>("/bad").await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_network_failure_is_a_request_error() {
        // Nothing listens on the discard port of the loopback interface
        let client = MyFinStocksClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(2)).unwrap();

        let err = client.get_json::<Value>("/anything").await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }

    #[tokio::test]
    async fn test_requests_disable_caching() {
        let server = TestServer::start(vec![Route::new("/echo", 200, "{}")]).await;

        let _: Value = client(&server).get_json("/echo").await.unwrap();

        let request = server.requests().remove(0);
        assert_eq!(request.method, "GET");
        assert_eq!(request.uri, "/echo");
        assert_eq!(request.header("cache-control"), Some("no-cache, no-store"));
        assert_eq!(request.header("pragma"), Some("no-cache"));
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_cached_price_path() {
        let server = TestServer::start(vec![Route::new(
            "/api/v1/prices/RELIANCE",
            200,
            r#"{"symbol":"RELIANCE","live_price":"2850.50"}"#,
        )])
        .await;

        let cached = client(&server).get_cached_price("RELIANCE").await.unwrap();
        assert_eq!(cached.exchange, "NSE");
        assert_eq!(cached.live_price, Some(PriceValue::from("2850.50")));

        let uris: Vec<String> = server.requests().into_iter().map(|r| r.uri).collect();
        assert_eq!(uris, vec!["/api/v1/prices/RELIANCE"]);
    }

    #[tokio::test]
    async fn test_cached_price_symbol_is_one_escaped_segment() {
        let server = TestServer::start(Vec::new()).await;
        let client = client(&server);

        for symbol in ["M&M#X", "A/B", "X?y=1"] {
            let err = client.get_cached_price(symbol).await.unwrap_err();
            assert_eq!(err.status(), Some(404));
        }

        let uris: Vec<String> = server.requests().into_iter().map(|r| r.uri).collect();
        assert_eq!(
            uris,
            vec![
                "/api/v1/prices/M&M%23X",
                "/api/v1/prices/A%2FB",
                "/api/v1/prices/X%3Fy=1",
            ]
        );
    }

    #[tokio::test]
    async fn test_unusable_base_url_is_rejected() {
        let client = MyFinStocksClient::new("not a url".to_string(), Duration::from_secs(1)).unwrap();
        let err = client.get_json::<Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
