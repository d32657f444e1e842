//! Backend availability indicator

use crate::api::Backend;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Checking,
    Online,
    Offline,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checking => "Checking...",
            Self::Online => "API Online",
            Self::Offline => "API Offline",
        })
    }
}

/// Result of the most recent health check
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: ApiStatus,
    pub last_checked: Option<DateTime<Utc>>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: ApiStatus::Checking,
            last_checked: None,
        }
    }
}

impl HealthStatus {
    /// Probe `/api/health` and record the outcome
    pub async fn refresh(&mut self, backend: &dyn Backend) -> ApiStatus {
        self.status = match backend.health().await {
            Ok(response) if response.is_online() => ApiStatus::Online,
            Ok(response) => {
                warn!("Health endpoint answered with status '{}'", response.status);
                ApiStatus::Offline
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                ApiStatus::Offline
            }
        };
        self.last_checked = Some(Utc::now());
        self.status
    }
}
