//! # HTTP Transport
//!
//! reqwest-backed implementation of the `Transport` seam. One POST per
//! commit, a configurable timeout, never a retry.

use async_trait::async_trait;
use bean_core::{GatewayError, GatewayResult, Transport};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTPS transport for the gateway endpoints.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, body: String) -> GatewayResult<(u16, String)> {
        debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok((status, text))
    }
}
