//! Server configuration
//!
//! Layered with figment: built-in defaults, then the optional YAML file, then
//! `INSPECTION_*` environment variables (`__` separates nested keys, e.g.
//! `INSPECTION_DATABASE__URL`).

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "INSPECTION_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Inspection engine module section, passed through untouched
    #[serde(default)]
    pub inspection: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory photos are written to and served from under `/uploads`
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8087".to_string()
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Any sea-orm connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,inspection_engine=debug,tower_http=info".to_string()
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Typed module section; defaults when absent
    pub fn inspection(&self) -> Result<inspection_engine::config::Config> {
        match &self.inspection {
            Some(value) => serde_json::from_value(value.clone())
                .context("invalid `inspection` configuration section"),
            None => Ok(Default::default()),
        }
    }
}
