//! Application configuration
//!
//! Layered from an optional TOML file and `READINESS__`-prefixed environment
//! variables (`READINESS__API__BASE_URL`, `READINESS__GEO__SOURCE`, ...). A
//! `.env` file is read first when present.

use crate::api::ApiConfig;
use crate::error::Result;
use crate::geo::GeoSource;
use crate::reconcile::{AliasError, AliasTable};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Boundary data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// `backend`, an http(s) URL, or a file path
    #[serde(default)]
    pub source: GeoSource,

    /// Drop features that belong to other countries
    #[serde(default = "default_filter_ghana")]
    pub filter_ghana: bool,
}

fn default_filter_ghana() -> bool {
    true
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            source: GeoSource::default(),
            filter_ghana: default_filter_ghana(),
        }
    }
}

/// Region reconciliation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Alias table file replacing the built-in one
    #[serde(default)]
    pub alias_file: Option<PathBuf>,
}

impl ReconcilerConfig {
    /// Load the configured alias table, or the built-in one
    pub fn load_aliases(&self) -> std::result::Result<AliasTable, AliasError> {
        match &self.alias_file {
            Some(path) => {
                debug!("Loading alias table from {}", path.display());
                AliasTable::from_file(path)
            }
            None => AliasTable::builtin(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Config = builder
            .add_source(Environment::with_prefix("READINESS").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config.with_env_overrides())
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Parse configuration from TOML text, without environment layering
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        self.api = self.api.from_env();
        self
    }
}
