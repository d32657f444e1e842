//! Crate-level error type

use crate::api::ApiError;
use crate::geo::GeoError;
use crate::reconcile::AliasError;

/// Errors surfaced by the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Alias table error: {0}")]
    Alias(#[from] AliasError),

    #[error("Boundary data error: {0}")]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message shown inline next to the affected panel
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
