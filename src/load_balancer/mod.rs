//! Backend pool subsystem.
//!
//! # Data Flow
//! ```text
//! rpc_list.json default_rpc_list
//!     → backend.rs (parse each endpoint URL)
//!     → pool.rs (immutable ordered pool)
//!     → Apply selection strategy:
//!         - routing_id.rs (id mod n, or uniform random)
//!     → &Backend handed to the upstream client
//! ```
//!
//! # Design Decisions
//! - The pool is built once and never mutated
//! - Selection is stateless; no health tracking, no connection counting
//! - An empty pool is a startup error, so selection cannot fail

use std::fmt::Debug;
use std::num::NonZeroUsize;
use thiserror::Error;

pub mod backend;
pub mod pool;
pub mod routing_id;

pub use backend::Backend;
pub use pool::BackendPool;
pub use routing_id::RoutingIdSelector;

/// Strategy for picking a backend index.
pub trait BackendSelector: Send + Sync + Debug {
    /// Return an index in `[0, len)`.
    fn select_index(&self, len: NonZeroUsize, routing_id: Option<i64>) -> usize;
}

/// Errors raised while building the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("backend pool is empty")]
    Empty,

    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("backend URL '{0}' has no host")]
    MissingHost(String),
}
