//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest { raw_body, routing_id }
//!     → parse JSON, read `method`
//!     → cacheable? → cache hit → Cached
//!     → cache miss / not cacheable
//!         → BackendPool::select(routing_id)
//!         → Upstream::forward
//!         → Ok  → store if cacheable and non-empty → Fetched
//!         → Err → log → UpstreamFailed
//! ```
//!
//! # Design Decisions
//! - Upstream failures are an outcome, not an error; the HTTP layer decides
//!   how to present them
//! - Only malformed request bodies produce a `DispatchError`

pub mod dispatcher;

pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher, InboundRequest};
