//! # Transport Seam
//!
//! The gateway speaks `application/x-www-form-urlencoded` POST bodies and
//! answers with a status code and a text body. Everything network-shaped
//! sits behind this trait so transactions can be exercised against a mock.

use crate::error::GatewayResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A single request/response exchange with the gateway.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a form-encoded body and return `(status, body)`.
    ///
    /// Implementations must not retry: one commit maps to exactly one
    /// exchange on the wire.
    async fn post_form(&self, url: &str, body: String) -> GatewayResult<(u16, String)>;
}

/// Type alias for a shared transport (dynamic dispatch)
pub type BoxedTransport = Arc<dyn Transport>;
