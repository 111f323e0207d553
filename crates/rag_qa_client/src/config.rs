//! Client config load/save for `~/.rag-qa/config.yaml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{DEFAULT_HEALTH_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

pub const CONFIG_ENV_VAR: &str = "RAG_QA_CONFIG";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Server section (base_url, or host + port).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Client section (request and health-check timeouts, in seconds).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ClientSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl Config {
    /// Server root: `base_url`, else `http://host:port`, else the local default.
    pub fn base_url(&self) -> String {
        if let Some(url) = self.server.base_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        match (&self.server.host, self.server.port) {
            (None, None) => DEFAULT_BASE_URL.to_string(),
            (host, port) => format!(
                "http://{}:{}",
                host.as_deref().unwrap_or("127.0.0.1"),
                port.unwrap_or(5000)
            ),
        }
    }

    /// Query timeout; `0` disables it.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.client.request_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn health_timeout(&self) -> Duration {
        self.client
            .health_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HEALTH_TIMEOUT)
    }
}

/// Returns the default config file path: `~/.rag-qa/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".rag-qa").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Load config, treating a missing file as the default config.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load(path) {
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
