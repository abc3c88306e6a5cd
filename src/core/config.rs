//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub admin: AdminConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub permissive_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file (default: $LEASEHUB_HOME/catalog.json)
    pub path: Option<PathBuf>,
    /// Populate an empty catalog file with the demo buildings on first start
    pub seed_on_empty: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared bearer token for mutating routes. No token = admin API disabled.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size when the request has no limit
    pub default_limit: usize,
    /// Upper bound on a requested limit
    pub max_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached result sets
    pub max_queries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            permissive_cors: false,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed_on_empty: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_queries: 256 }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Config::default()
        };

        if let Ok(token) = std::env::var("LEASEHUB_ADMIN_TOKEN") {
            if !token.is_empty() {
                config.admin.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        // A blank token leaves the admin API disabled
        config.admin.token = config.admin.token.filter(|t| !t.trim().is_empty());
        if config.search.default_limit == 0 || config.search.max_limit == 0 {
            return Err(Error::ConfigError {
                message: "search limits must be greater than zero".to_string(),
            });
        }
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::leasehub_home()?.join("config.toml"))
    }

    /// Get the leasehub home directory
    pub fn leasehub_home() -> Result<PathBuf> {
        // Check LEASEHUB_HOME env var first
        if let Ok(home) = std::env::var("LEASEHUB_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "leasehub", "leasehub")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine leasehub home directory".to_string(),
            })
    }

    /// Resolve the catalog file path
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::leasehub_home()?.join("catalog.json")),
        }
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::leasehub_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }

    /// Clamp a requested page size to the configured bounds
    pub fn page_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.search.default_limit)
            .clamp(1, self.search.max_limit)
    }
}

pub const DEFAULT_PORT: u16 = 3000;
