//! Upstream RPC forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher (cache miss)
//!     → load_balancer picks a Backend
//!     → client.rs (one POST, body verbatim)
//!     → 2xx: Ok(body) | otherwise: Err(UpstreamError)
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per request: no retries, backoff or timeout
//! - Non-2xx bodies are kept so they can be logged or surfaced
//! - Errors are `Clone` so a single fetch can be shared by waiters

use bytes::Bytes;
use std::future::Future;
use thiserror::Error;

use crate::load_balancer::Backend;

pub mod client;

pub use client::UpstreamClient;

/// Failure of a single forwarded call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Backend answered with a non-2xx status.
    #[error("upstream {backend} returned status {status}")]
    Status {
        backend: String,
        status: u16,
        body: String,
    },

    /// Connection, TLS or body read failure.
    #[error("transport error calling {backend}: {message}")]
    Transport { backend: String, message: String },
}

impl UpstreamError {
    /// HTTP status returned by the backend, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport { .. } => None,
        }
    }

    /// Response body for status failures, transport message otherwise.
    pub fn detail(&self) -> &str {
        match self {
            UpstreamError::Status { body, .. } => body,
            UpstreamError::Transport { message, .. } => message,
        }
    }
}

/// Something that can carry a raw JSON-RPC body to a backend.
pub trait Upstream: Send + Sync + 'static {
    /// POST `body` to `backend`, resolving with the response body on 2xx.
    fn forward(
        &self,
        backend: &Backend,
        body: Bytes,
    ) -> impl Future<Output = Result<Bytes, UpstreamError>> + Send;
}
