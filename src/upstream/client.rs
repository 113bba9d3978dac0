//! HTTP(S) client for forwarding JSON-RPC bodies.
//!
//! # Responsibilities
//! - Issue one POST per forwarded request
//! - Copy the inbound body verbatim, without adding a content type
//! - Classify the result by status code

use bytes::Bytes;
use std::time::Instant;

use crate::config::UpstreamConfig;
use crate::load_balancer::Backend;
use crate::observability::metrics;
use crate::upstream::{Upstream, UpstreamError};

/// reqwest-backed upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Create a client. No request timeout is configured.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn send(&self, backend: &Backend, body: Bytes) -> Result<Bytes, UpstreamError> {
        let transport = |e: reqwest::Error| UpstreamError::Transport {
            backend: backend.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .post(backend.url.clone())
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let payload = response.bytes().await.map_err(transport)?;

        if status.is_success() {
            Ok(payload)
        } else {
            Err(UpstreamError::Status {
                backend: backend.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&payload).into_owned(),
            })
        }
    }
}

impl Upstream for UpstreamClient {
    async fn forward(&self, backend: &Backend, body: Bytes) -> Result<Bytes, UpstreamError> {
        let start = Instant::now();
        let result = self.send(backend, body).await;

        metrics::record_upstream(&backend.host, result.is_ok(), start);
        tracing::debug!(
            backend = %backend,
            success = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream call finished"
        );

        result
    }
}
