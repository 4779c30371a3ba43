//! HTTP client utilities for public JSON APIs.
//!
//! This module provides a lightweight client wrapper that focuses on:
//!
//! - Constructing an HTTP client with a request timeout and JSON defaults
//! - Validating endpoint URLs before any request is issued
//! - Building GET requests with a consistent User-Agent and query string
//!
//! The primary entry point is [`ApiClient`]. Create an instance via
//! [`ApiClient::new`], and then build requests with [`ApiClient::get`].
//!
//! # Example
//!
//! ```ignore
//! use apifetch_api::ApiClient;
//! use std::time::Duration;
//!
//! async fn run() -> anyhow::Result<()> {
//!     let client = ApiClient::new(Duration::from_secs(15), "apifetch/0.1")?;
//!     let res = client.get("https://jsonplaceholder.typicode.com/users", &[])?.send().await?;
//!     println!("status: {}", res.status());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url, header};
use thiserror::Error;
use tracing::debug;

/// Errors raised while preparing a request, before anything is sent.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client`.
///
/// Idle connections are not pooled: every exchange opens its own connection
/// and releases it once the response has been read or the timeout fires.
pub struct ApiClient {
    pub http: Client,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ApiClient {
    /// Construct an [`ApiClient`] with the given total request timeout.
    ///
    /// The timeout covers connecting, sending and reading the full body.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, ClientError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            http,
            user_agent: user_agent.into(),
            timeout,
        })
    }

    /// Build a GET `reqwest::RequestBuilder` for an absolute URL.
    ///
    /// The URL is validated first; `query` pairs are appended in order.
    pub fn get(&self, url: &str, query: &[(String, String)]) -> Result<RequestBuilder, ClientError> {
        let parsed = validate_base_url(url)?;
        debug!(url = %parsed, query_parameter_count = query.len(), "building request");

        let mut builder = self.http.get(parsed).header(header::USER_AGENT, &self.user_agent);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder)
    }
}

/// Validate that a URL is acceptable for use by the client.
///
/// Rules:
/// - the URL must parse
/// - the scheme must be `http` or `https`
/// - a host must be present
pub fn validate_base_url(base: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;

    if !matches!(parsed_base_url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}://'", parsed_base_url.scheme())));
    }

    if parsed_base_url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL must include a host".to_string()));
    }

    Ok(parsed_base_url)
}
