use crate::dist::CURRENT_IPFS_DIST;
use crate::fetch::{DEFAULT_FETCH_LIMIT, HttpConfig};
use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dist: DistConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Distribution root selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistConfig {
    /// Used when `IPFS_DIST_PATH` is unset or empty
    #[serde(default = "default_dist_path")]
    pub path: String,
}

impl Default for DistConfig {
    fn default() -> Self {
        Self {
            path: default_dist_path(),
        }
    }
}

fn default_dist_path() -> String {
    CURRENT_IPFS_DIST.to_string()
}

/// Backend chain and per-fetch limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Gateway base URLs, tried in order
    #[serde(default = "default_gateways")]
    pub gateways: Vec<String>,
    /// Local directory mirroring the distribution, tried before any gateway
    pub mirror_dir: Option<PathBuf>,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: ByteSize,
    /// Overall deadline for one fetch, across every backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            gateways: default_gateways(),
            mirror_dir: None,
            max_bytes: default_max_bytes(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gateways() -> Vec<String> {
    vec!["https://ipfs.io".to_string()]
}

fn default_max_bytes() -> ByteSize {
    ByteSize(DEFAULT_FETCH_LIMIT)
}

fn default_timeout_secs() -> u64 {
    300
}

/// HTTP client settings shared by every gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    HttpConfig::default().user_agent
}
