//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream RPC endpoint
//! - Validate the endpoint URL once, at startup

use std::fmt;
use url::Url;

use crate::load_balancer::PoolError;

/// A single upstream RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Full endpoint URL the request is POSTed to.
    pub url: Url,
    /// Host (and explicit port, if any) for logging and metric labels.
    pub host: String,
    /// Request path on the host.
    pub path: String,
}

impl Backend {
    /// Parse an endpoint URL such as `https://rpc.example.com/key`.
    pub fn parse(raw: &str) -> Result<Self, PoolError> {
        let url = Url::parse(raw.trim()).map_err(|e| PoolError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PoolError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(PoolError::MissingHost(raw.to_string())),
        };
        let path = url.path().to_string();

        Ok(Self { url, host, path })
    }

    /// True when calls to this backend travel over TLS.
    pub fn is_encrypted(&self) -> bool {
        self.url.scheme() == "https"
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)
    }
}
