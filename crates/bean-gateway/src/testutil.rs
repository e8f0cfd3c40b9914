//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use bean_core::{GatewayResult, Transport};
use std::sync::Mutex;

/// A transport that answers every request with a canned body and records
/// what was sent.
pub(crate) struct StaticTransport {
    status: u16,
    body: String,
    requests: Mutex<Vec<(String, String)>>,
}

impl StaticTransport {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The `(url, body)` pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn post_form(&self, url: &str, body: String) -> GatewayResult<(u16, String)> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Ok((self.status, self.body.clone()))
    }
}
