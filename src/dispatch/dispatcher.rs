//! Per-request orchestration: cache lookup, backend selection, forwarding and
//! cache population.

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::cache::{SingleFlight, TtlCache};
use crate::config::CacheConfig;
use crate::load_balancer::BackendPool;
use crate::observability::metrics;
use crate::upstream::{Upstream, UpstreamClient, UpstreamError};

/// A buffered client request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// JSON-RPC body exactly as received.
    pub raw_body: Bytes,
    /// Backend routing id from the URL path, if any.
    pub routing_id: Option<i64>,
}

impl InboundRequest {
    pub fn new(raw_body: impl Into<Bytes>, routing_id: Option<i64>) -> Self {
        Self {
            raw_body: raw_body.into(),
            routing_id,
        }
    }
}

/// How a request was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Served from the TTL cache; no upstream call was made.
    Cached(Bytes),
    /// Upstream answered with a 2xx.
    Fetched(Bytes),
    /// Upstream call failed. Nothing was cached.
    UpstreamFailed(UpstreamError),
}

impl DispatchOutcome {
    /// Payload to relay to the client, if the request succeeded.
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            DispatchOutcome::Cached(body) | DispatchOutcome::Fetched(body) => Some(body),
            DispatchOutcome::UpstreamFailed(_) => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Cached(_) => "cached",
            DispatchOutcome::Fetched(_) => "fetched",
            DispatchOutcome::UpstreamFailed(_) => "upstream_failed",
        }
    }
}

impl From<Result<Bytes, UpstreamError>> for DispatchOutcome {
    fn from(result: Result<Bytes, UpstreamError>) -> Self {
        match result {
            Ok(body) => DispatchOutcome::Fetched(body),
            Err(e) => DispatchOutcome::UpstreamFailed(e),
        }
    }
}

/// Request-level failures that never reach a backend.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Routes one request through the cache and the backend pool.
#[derive(Debug)]
pub struct Dispatcher<U = UpstreamClient> {
    pool: BackendPool,
    upstream: U,
    cache: TtlCache,
    in_flight: Option<SingleFlight<Result<Bytes, UpstreamError>>>,
}

impl<U: Upstream> Dispatcher<U> {
    pub fn new(pool: BackendPool, upstream: U, config: &CacheConfig) -> Self {
        Self {
            pool,
            upstream,
            cache: TtlCache::new(config.ttls()),
            in_flight: config.coalesce_in_flight.then(SingleFlight::new),
        }
    }

    /// Answer one request.
    pub async fn dispatch(
        &self,
        request: InboundRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let method = extract_method(&request.raw_body)?;

        let Some(method) = method.filter(|m| self.cache.is_cacheable(m)) else {
            let result = self.forward(&request).await;
            return Ok(self.finish(result));
        };

        if let Some(hit) = self.cache.get(&method) {
            metrics::record_cache_lookup(&method, true);
            tracing::debug!(method = %method, "Cache hit");
            return Ok(DispatchOutcome::Cached(hit));
        }
        metrics::record_cache_lookup(&method, false);

        let request = &request;
        let method = method.as_str();
        let result = match &self.in_flight {
            Some(flights) => {
                flights
                    .run(method, move || self.fetch_and_store(method, request))
                    .await
            }
            None => self.fetch_and_store(method, request).await,
        };

        Ok(self.finish(result))
    }

    /// The backend pool requests are forwarded to.
    pub fn pool(&self) -> &BackendPool {
        &self.pool
    }

    /// The response cache.
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    async fn fetch_and_store(
        &self,
        method: &str,
        request: &InboundRequest,
    ) -> Result<Bytes, UpstreamError> {
        let result = self.forward(request).await;
        if let Ok(body) = &result {
            if self.cache.add(method, body.clone()) {
                tracing::debug!(method, bytes = body.len(), "Cached response");
            }
        }
        result
    }

    async fn forward(&self, request: &InboundRequest) -> Result<Bytes, UpstreamError> {
        let backend = self.pool.select(request.routing_id);
        tracing::debug!(
            backend = %backend,
            routing_id = ?request.routing_id,
            "Forwarding request"
        );
        self.upstream
            .forward(backend, request.raw_body.clone())
            .await
    }

    fn finish(&self, result: Result<Bytes, UpstreamError>) -> DispatchOutcome {
        if let Err(e) = &result {
            tracing::warn!(error = %e, detail = %e.detail(), "Upstream request failed");
        }
        result.into()
    }
}

/// The `method` of a single JSON-RPC object; `None` for batches and objects
/// without a string method.
fn extract_method(body: &[u8]) -> Result<Option<String>, DispatchError> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(value
        .get("method")
        .and_then(Value::as_str)
        .map(str::to_owned))
}
