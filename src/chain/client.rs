//! REST client for Cosmos SDK light-client (LCD) endpoints

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

/// Abstract access to a chain's REST gateway
///
/// Implemented by [`RestClient`] for real nodes and by in-memory fakes in tests.
#[async_trait::async_trait]
pub trait QueryClient: Send + Sync + 'static {
    /// GET a path with query parameters and parse the JSON body
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    /// POST a JSON body and parse the JSON response
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// Base URL, for display
    fn endpoint(&self) -> &str;
}

/// HTTP implementation over reqwest
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl QueryClient for RestClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%url, params = query.len(), "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        read_json(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;
        read_json(response).await
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .with_context(|| format!("invalid JSON body (HTTP {status})"))?;
    if !status.is_success() {
        anyhow::bail!("HTTP {}: {}", status.as_u16(), gateway_message(&body));
    }
    Ok(body)
}

/// Error text from a gRPC-gateway error body (`{"code": .., "message": ..}`)
pub fn gateway_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
