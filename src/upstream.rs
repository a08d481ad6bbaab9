//! Upstream HTTP client
//!
//! One GET per call. No retries, no caching; the only policy is the
//! request timeout.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::error::{ConfigError, ToolError};

/// A single outbound request: endpoint, query, optional auth, and the field
/// whose presence marks the body as usable
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub authorization: Option<String>,
    pub marker: &'static str,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>, marker: &'static str) -> Self {
        Self { url: url.into(), query: Vec::new(), authorization: None, marker }
    }

    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    pub fn authorization(mut self, key: impl Into<String>) -> Self {
        self.authorization = Some(key.into());
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }
}

pub struct UpstreamClient {
    http: Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("surf-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http, timeout })
    }

    /// Issue the request and decode the body; the marker is checked by the caller
    pub async fn fetch(&self, request: &UpstreamRequest) -> Result<Value, ToolError> {
        let started = Instant::now();
        let mut builder = self.http.get(&request.url).query(&request.query);
        if let Some(key) = &request.authorization {
            builder = builder.header(AUTHORIZATION, key);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), url = %request.url, "Upstream returned an error status");
            return Err(ToolError::status(status.as_u16(), url, &text));
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let body = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            tracing::error!(url = %request.url, "Invalid JSON response from API: {e}");
            ToolError::InvalidJson
        })?;

        tracing::debug!(
            url = %request.url,
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = bytes.len(),
            "Upstream response received"
        );
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> ToolError {
        if e.is_timeout() {
            tracing::warn!("Upstream request timed out: {e}");
            ToolError::Timeout(self.timeout.as_secs())
        } else {
            tracing::error!("API request failed: {e}");
            ToolError::Transport(e.to_string())
        }
    }
}
