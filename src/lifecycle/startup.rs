//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the RPC endpoint list and build the backend pool
//! - Build the upstream client, dispatcher and HTTP server in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound by the caller, after the server is ready

use std::path::Path;
use thiserror::Error;

use crate::config::{load_rpc_list, ConfigError, ProxyConfig};
use crate::dispatch::Dispatcher;
use crate::http::HttpServer;
use crate::load_balancer::{BackendPool, PoolError};
use crate::upstream::UpstreamClient;

/// Errors that stop the proxy from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backend pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build a ready-to-run server from config and the RPC list on disk.
pub fn build_server(config: &ProxyConfig) -> Result<HttpServer, StartupError> {
    let rpc_list = load_rpc_list(Path::new(&config.rpc_list_path))?;

    tracing::info!(
        path = %config.rpc_list_path,
        default_rpcs = rpc_list.default_rpc_list.len(),
        submit_rpcs = rpc_list.submit_rpc_list.len(),
        "RPC list loaded"
    );

    build_server_with_backends(config, &rpc_list.default_rpc_list)
}

/// Build a ready-to-run server for an explicit list of backend URLs.
pub fn build_server_with_backends<S: AsRef<str>>(
    config: &ProxyConfig,
    backend_urls: &[S],
) -> Result<HttpServer, StartupError> {
    let pool = BackendPool::from_urls(backend_urls)?;
    for (index, backend) in pool.backends().iter().enumerate() {
        tracing::info!(index, backend = %backend, "Backend registered");
    }

    let upstream = UpstreamClient::new(&config.upstream)?;
    let dispatcher = Dispatcher::new(pool, upstream, &config.cache);

    tracing::info!(
        cacheable_methods = config.cache.ttl_ms.len(),
        coalesce_in_flight = config.cache.coalesce_in_flight,
        failure_policy = ?config.upstream.failure_policy,
        "Dispatcher ready"
    );

    Ok(HttpServer::new(dispatcher, config.upstream.failure_policy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rpc_list_is_fatal() {
        let mut config = ProxyConfig::default();
        config.rpc_list_path = "/nonexistent/rpc_list.json".into();
        assert!(matches!(
            build_server(&config),
            Err(StartupError::Config(ConfigError::Io { .. }))
        ));
    }

    #[test]
    fn test_empty_pool_is_fatal() {
        let urls: Vec<String> = Vec::new();
        assert!(matches!(
            build_server_with_backends(&ProxyConfig::default(), &urls),
            Err(StartupError::Pool(PoolError::Empty))
        ));
    }

    #[test]
    fn test_builds_with_backends() {
        assert!(build_server_with_backends(
            &ProxyConfig::default(),
            &["https://a.example/", "https://b.example/"]
        )
        .is_ok());
    }
}
