//! Single HTTP call against the upstream data API.
//!
//! Everything above this layer (retry, fallback chain, sample data) works in
//! terms of [`HttpFetcher`], so tests can script upstream behaviour without a
//! network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Upstream rejects requests that do not look like they come from a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";
/// Response bodies are truncated to this many characters in trace output.
const TRACE_BODY_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),

    #[error("could not decode upstream payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// A 2xx body that is not JSON comes back the same on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Decode(_))
    }
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Value, FetchError>;
}

/// reqwest-backed fetcher used in production.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Value, FetchError> {
        debug!(
            url = %request.url,
            method = ?request.method,
            params = ?request.query,
            "upstream request"
        );

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let mut builder = builder.query(&request.query).timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_send_error)?;

        debug!(
            status = status.as_u16(),
            body = %truncate_chars(&body, TRACE_BODY_CHARS),
            "upstream response"
        );

        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn classify_send_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn get(url: String) -> FetchRequest {
        FetchRequest {
            url,
            method: HttpMethod::Get,
            query: vec![("apikey".to_string(), "k".to_string())],
            body: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_json_and_sends_identifying_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/job")
                    .query_param("apikey", "k")
                    .header("accept", ACCEPT)
                    .header("user-agent", USER_AGENT);
                then.status(200).json_body(json!({"jobs": [{"id": "1"}]}));
            })
            .await;

        let fetcher = ReqwestFetcher::new().unwrap();
        let payload = fetcher.fetch(&get(server.url("/job"))).await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload["jobs"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_fetch_classifies_non_2xx_as_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tests");
                then.status(503).body("maintenance");
            })
            .await;

        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher.fetch(&get(server.url("/tests"))).await.unwrap_err();
        assert_eq!(err, FetchError::HttpStatus(503));
    }

    #[tokio::test]
    async fn test_fetch_classifies_html_body_as_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/school");
                then.status(200).body("<html>login required</html>");
            })
            .await;

        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher.fetch(&get(server.url("/school"))).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_posts_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/psychTest/1/results")
                    .json_body(json!({"1": "그렇다"}));
                then.status(200).json_body(json!({"RESULT": {"summary": "ok"}}));
            })
            .await;

        let mut request = get(server.url("/psychTest/1/results"));
        request.method = HttpMethod::Post;
        request.body = Some(json!({"1": "그렇다"}));

        let fetcher = ReqwestFetcher::new().unwrap();
        let payload = fetcher.fetch(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload["RESULT"]["summary"], "ok");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher
            .fetch(&get("http://127.0.0.1:9/unreachable".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_slower_than_timeout_is_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/counseling");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"cases": []}));
            })
            .await;

        let mut request = get(server.url("/counseling"));
        request.timeout = Duration::from_millis(50);

        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher.fetch(&request).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("직업백과", 2), "직업");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
