use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::pipeline::classification::HeuristicPolicy;

/// Application-level constants
pub const APP_NAME: &str = "SafeLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var holding the completion endpoint. Its presence is the capability flag.
pub const ENV_PROVIDER_URL: &str = "SAFELENS_PROVIDER_URL";
pub const ENV_MODEL: &str = "SAFELENS_MODEL";
pub const ENV_BIND_ADDR: &str = "SAFELENS_BIND_ADDR";
pub const ENV_POLICY_FILE: &str = "SAFELENS_POLICY_FILE";

pub const DEFAULT_MODEL: &str = "gemma3:4b";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,safelens=debug"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read policy file {path}: {source}")]
    PolicyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy file {path}: {source}")]
    PolicyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid bind address '{0}'")]
    BindAddr(String),
}

/// Runtime configuration consumed by the classifier and the HTTP surface.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Completion endpoint. `None` routes every submission to the fallback.
    pub provider_url: Option<String>,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub policy_file: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::BindAddr(bind_raw.clone()))?;

        Ok(Self {
            provider_url: get(ENV_PROVIDER_URL),
            model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind_addr,
            policy_file: get(ENV_POLICY_FILE).map(PathBuf::from),
        })
    }

    /// Whether the completion capability is available.
    pub fn is_configured(&self) -> bool {
        self.provider_url.is_some()
    }

    /// Load the heuristic policy, applying the override file if one is set.
    pub fn load_policy(&self) -> Result<HeuristicPolicy, ConfigError> {
        match &self.policy_file {
            Some(path) => load_policy_file(path),
            None => Ok(HeuristicPolicy::default()),
        }
    }
}

/// Parse a JSON policy override. Fields absent from the file keep their defaults.
pub fn load_policy_file(path: &Path) -> Result<HeuristicPolicy, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::PolicyParse {
        path: path.to_path_buf(),
        source,
    })
}
