//! Backend pool management.
//!
//! # Responsibilities
//! - Hold the ordered, immutable list of upstream endpoints
//! - Apply the selection strategy to pick one per request

use std::num::NonZeroUsize;

use crate::load_balancer::{
    backend::Backend, routing_id::RoutingIdSelector, BackendSelector, PoolError,
};

/// The immutable set of upstream endpoints.
#[derive(Debug)]
pub struct BackendPool {
    backends: Vec<Backend>,
    len: NonZeroUsize,
    selector: Box<dyn BackendSelector>,
}

impl BackendPool {
    /// Build a pool from endpoint URLs using routing-id selection.
    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Result<Self, PoolError> {
        Self::with_selector(urls, Box::new(RoutingIdSelector::new()))
    }

    /// Build a pool from endpoint URLs with an explicit selector.
    pub fn with_selector<S: AsRef<str>>(
        urls: &[S],
        selector: Box<dyn BackendSelector>,
    ) -> Result<Self, PoolError> {
        let backends = urls
            .iter()
            .map(|url| Backend::parse(url.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let len = NonZeroUsize::new(backends.len()).ok_or(PoolError::Empty)?;

        for backend in backends.iter().filter(|b| !b.is_encrypted()) {
            tracing::warn!(backend = %backend, "Backend is not using https; traffic to it is unencrypted");
        }

        Ok(Self {
            backends,
            len,
            selector,
        })
    }

    /// Pick the backend for a request.
    pub fn select(&self, routing_id: Option<i64>) -> &Backend {
        let index = self.selector.select_index(self.len, routing_id);
        &self.backends[index % self.len.get()]
    }

    /// Number of backends in the pool (always > 0).
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Always false; an empty pool cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All backends, in configuration order.
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }
}
