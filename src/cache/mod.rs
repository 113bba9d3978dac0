//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher (cacheable method)
//!     → ttl.rs get(method)
//!         hit  → return stored payload
//!         miss → [single_flight.rs, if enabled] → upstream → ttl.rs add(method)
//! ```
//!
//! # Design Decisions
//! - One entry per method name; writes replace, never merge
//! - Expiry is checked on read only (lazy invalidation)
//! - Empty payloads are never stored

pub mod single_flight;
pub mod ttl;

pub use single_flight::SingleFlight;
pub use ttl::{CacheEntry, TtlCache};
