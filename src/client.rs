//! Client for the OpenCurrencyX exchange-rate API.
//!
//! Every endpoint method is a thin wrapper around
//! [`OpenCurrencyX::execute_request`], which issues a GET against
//! `base_url + path`, retries failed attempts, and returns the response body
//! as an untyped JSON value.

use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::time::Duration;

use crate::error::ClientError;
use crate::http::{DEFAULT_RETRIES, HttpTransport, RetryPolicy, Transport};

/// Base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Per-attempt request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Base currency for [`OpenCurrencyX::rates`] when none is given.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Connection settings for [`OpenCurrencyX`]. None of the values are
/// validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    retries: usize,
}

impl ClientConfig {
    /// Creates a config for `base_url` with the default timeout and retry
    /// count.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> usize {
        self.retries
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the currency API.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across tasks.
pub struct OpenCurrencyX<T: Transport = HttpTransport> {
    config: ClientConfig,
    retry: RetryPolicy,
    transport: T,
}

impl OpenCurrencyX<HttpTransport> {
    /// Creates a client backed by a fresh `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::build()?))
    }
}

impl<T: Transport> OpenCurrencyX<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let retry = RetryPolicy::new(config.retries);
        Self {
            config,
            retry,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GETs `base_url + path` with `params` as the query string, making up to
    /// `retries + 1` attempts. Returns the first successful body parsed as
    /// JSON, or [`ClientError::RequestFailed`] with the final attempt's error.
    #[tracing::instrument(skip(self, params))]
    pub async fn execute_request(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        let query: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let timeout = self.config.timeout;

        debug!("Requesting {} ({} attempt(s) max)...", url, self.retry.max_attempts());

        let body = self
            .retry
            .run(path, || self.transport.get(&url, &query, timeout))
            .await
            .map_err(|e| ClientError::RequestFailed(format!("{:#}", e)))?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Service health and the time rates were last refreshed.
    pub async fn status(&self) -> Result<Value, ClientError> {
        self.execute_request("/status", &[]).await
    }

    /// Supported currency codes.
    pub async fn currencies(&self) -> Result<Value, ClientError> {
        self.execute_request("/currencies", &[]).await
    }

    /// Latest rates relative to `base` (USD when `None`).
    pub async fn rates(&self, base: Option<&str>) -> Result<Value, ClientError> {
        let base = base.unwrap_or(DEFAULT_BASE_CURRENCY);
        self.execute_request("/rates", &[("base", base)]).await
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<Value, ClientError> {
        let amount = amount.to_string();
        self.execute_request("/convert", &[("from", from), ("to", to), ("amount", &amount)])
            .await
    }

    /// Rates relative to `base` on `date` (`YYYY-MM-DD`).
    pub async fn history(&self, base: &str, date: &str) -> Result<Value, ClientError> {
        self.execute_request("/history", &[("base", base), ("date", date)])
            .await
    }
}
