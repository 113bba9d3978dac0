//! JSON-RPC caching reverse proxy library.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
