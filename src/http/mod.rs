//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, routing id from path)
//!     → dispatch (cache / backend pool / upstream)
//!     → response.rs (payload or error → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{routing_id, MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
