//! Configuration system for smsgate.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $SMSGATE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/smsgate/config.toml
//!   3. ~/.config/smsgate/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsgateConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP API binds to.
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// MessageBird REST base URL.
    pub endpoint: String,
    /// API access key. Empty = log segments instead of sending them.
    pub access_key: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Pending segments held before submitters are made to wait.
    pub capacity: usize,
    /// One segment leaves the queue per interval. 0 = unthrottled.
    pub send_interval_ms: u64,
    /// How long a submission may wait for queue space before it is rejected.
    pub enqueue_timeout_ms: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://rest.messagebird.com".to_string(),
            access_key: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            send_interval_ms: 1000, // 1 SMS/s
            enqueue_timeout_ms: 2000,
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl QueueConfig {
    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to render default config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("queue.capacity must be at least 1")]
    ZeroQueueCapacity,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl SmsgateConfig {
    /// Load from the process environment and the config file it points at.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// `load` with an explicit variable lookup. A missing file means defaults.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = Self::path_with(&lookup);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => {
                Self::from_toml(&text).map_err(|source| ConfigError::Parse { path, source })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn file_path() -> PathBuf {
        Self::path_with(|key| std::env::var(key).ok())
    }

    /// `$SMSGATE_CONFIG`, else `smsgate/config.toml` under the XDG config
    /// home (`$HOME/.config` when unset).
    fn path_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(explicit) = lookup("SMSGATE_CONFIG") {
            return PathBuf::from(explicit);
        }
        let base = lookup("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_default();
        base.join("smsgate").join("config.toml")
    }

    /// Write the default config to [`file_path`](Self::file_path) unless a
    /// file is already there. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        Self::write_default_at(&path)?;
        Ok(path)
    }

    fn write_default_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Ok(());
        }
        let text = toml::to_string_pretty(&Self::default())?;
        let io = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io)?;
        }
        std::fs::write(path, text).map_err(io)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }

    /// Apply SMSGATE_* overrides. `lookup` is `std::env::var` outside tests.
    /// Unparseable numbers are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SMSGATE_SERVER__BIND") {
            self.server.bind = v;
        }
        if let Some(p) = lookup("SMSGATE_SERVER__PORT").and_then(|v| v.parse().ok()) {
            self.server.port = p;
        }
        if let Some(v) = lookup("SMSGATE_GATEWAY__ENDPOINT") {
            self.gateway.endpoint = v;
        }
        if let Some(v) = lookup("SMSGATE_GATEWAY__ACCESS_KEY") {
            self.gateway.access_key = v;
        }
        if let Some(n) = lookup("SMSGATE_QUEUE__CAPACITY").and_then(|v| v.parse().ok()) {
            self.queue.capacity = n;
        }
        if let Some(n) = lookup("SMSGATE_QUEUE__SEND_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.queue.send_interval_ms = n;
        }
        if let Some(n) = lookup("SMSGATE_QUEUE__ENQUEUE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.queue.enqueue_timeout_ms = n;
        }
    }
}
