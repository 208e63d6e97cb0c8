//! HTTP transport used by the currency client.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ocx-cli/", env!("OCX_VERSION"));

/// A single GET round-trip against the remote service.
///
/// Implementations return the response body of a 2xx response and an error
/// for anything else: non-2xx status, timeout, connection failure, or a body
/// that cannot be read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)], timeout: Duration)
    -> Result<String>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a transport with a default client carrying [`USER_AGENT`].
    pub fn build() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, query))]
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        timeout: Duration,
    ) -> Result<String> {
        debug!("GET {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            bail!("{}", describe_failure(status, &body));
        }

        Ok(body)
    }
}

/// Formats a non-2xx response, including the service's `{"error": ...}`
/// message when the body carries one.
fn describe_failure(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

    match message {
        Some(msg) => format!("HTTP {}: {}", status, msg),
        None => format!("HTTP {}", status),
    }
}
