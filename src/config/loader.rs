//! Configuration loading from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("RPC list parse error: {0}")]
    RpcList(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Endpoint lists shared with the claim process launcher.
///
/// The proxy only forwards to `default_rpc_list`; `submit_rpc_list` is read so
/// a single file can serve both consumers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RpcList {
    pub default_rpc_list: Vec<String>,

    #[serde(default)]
    pub submit_rpc_list: Vec<String>,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = read(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the RPC endpoint lists from a JSON file.
pub fn load_rpc_list(path: &Path) -> Result<RpcList, ConfigError> {
    let content = read(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
