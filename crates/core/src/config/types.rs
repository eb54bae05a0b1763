use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub env: Environment,
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Deployment environment. Only affects logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Environment {
    /// Default log level when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => "debug",
            Environment::Prod => "info",
        }
    }

    /// Whether log lines are emitted as JSON.
    pub fn json_logs(&self) -> bool {
        !matches!(self, Environment::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

/// Catalog storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file
    pub path: PathBuf,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    10
}

/// Config as exposed over the API (storage location omitted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub env: String,
    pub server: ServerConfig,
    pub storage_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            env: config.env.as_str().to_string(),
            server: config.server.clone(),
            storage_configured: !config.storage.path.as_os_str().is_empty(),
        }
    }
}
