//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration for the RPC proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Path of the JSON file holding the RPC endpoint lists.
    pub rpc_list_path: String,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Outbound call settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            rpc_list_path: "rpc_list.json".to_string(),
            cache: CacheConfig::default(),
            upstream: UpstreamConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Cacheable methods and their lifetimes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Method name -> time-to-live in milliseconds.
    ///
    /// A method is cacheable iff it appears here.
    pub ttl_ms: HashMap<String, u64>,

    /// Share one upstream fetch between concurrent misses of the same method.
    pub coalesce_in_flight: bool,
}

impl CacheConfig {
    /// TTL table converted to durations.
    pub fn ttls(&self) -> HashMap<String, Duration> {
        self.ttl_ms
            .iter()
            .map(|(method, ms)| (method.clone(), Duration::from_millis(*ms)))
            .collect()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let ttl_ms = [
            ("getVersion", 120_000),
            ("getRecentPrioritizationFees", 5_000),
            ("getLatestBlockhash", 5_000),
        ]
        .into_iter()
        .map(|(method, ms)| (method.to_string(), ms))
        .collect();

        Self {
            ttl_ms,
            coalesce_in_flight: false,
        }
    }
}

/// What the client sees when the selected backend fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Answer 200 with an empty body (legacy behaviour).
    #[default]
    Swallow,
    /// Answer 502 with the upstream error as JSON.
    Surface,
}

/// Upstream (backend) call configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// How upstream failures are reported to clients.
    pub failure_policy: FailurePolicy,

    /// Optional User-Agent for outbound calls. None sends reqwest's default (no header).
    pub user_agent: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.cache.ttl_ms.get("getVersion"), Some(&120_000));
        assert_eq!(config.cache.ttl_ms.get("getLatestBlockhash"), Some(&5_000));
        assert!(!config.cache.coalesce_in_flight);
        assert_eq!(config.upstream.failure_policy, FailurePolicy::Swallow);
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            rpc_list_path = "/etc/proxy/rpc_list.json"

            [upstream]
            failure_policy = "surface"

            [cache]
            coalesce_in_flight = true

            [cache.ttl_ms]
            getSlot = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc_list_path, "/etc/proxy/rpc_list.json");
        assert_eq!(config.upstream.failure_policy, FailurePolicy::Surface);
        assert!(config.cache.coalesce_in_flight);
        // An explicit table replaces the defaults entirely
        assert_eq!(config.cache.ttl_ms.len(), 1);
        assert_eq!(
            config.cache.ttls().get("getSlot"),
            Some(&Duration::from_millis(400))
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
    }
}
