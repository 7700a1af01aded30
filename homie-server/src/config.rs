//! Server configuration
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. TOML file (`homie.toml` or `--config`)
//! 3. Environment (`DATABASE_URL`, `HOMIE_BIND`)
//! 4. Command-line flags (applied by the binary)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or the config file")]
    MissingDatabaseUrl,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection string
    pub database_url: Option<String>,

    /// Pool size
    pub max_connections: u32,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Default config file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "homie.toml";

    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(Self::FILE_NAME).exists() => {
                Self::from_file(Path::new(Self::FILE_NAME))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database_url = Some(url);
        }

        if let Some(bind) = lookup("HOMIE_BIND").filter(|v| !v.is_empty()) {
            self.bind_addr = bind
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
        }

        Ok(())
    }

    /// The database URL, required to serve.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}
