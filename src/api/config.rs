//! Configuration for the readiness backend client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL (no trailing path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Header sent on every request so the tunneling proxy serves the API
    /// instead of its browser interstitial
    #[serde(default = "default_bypass_header")]
    pub bypass_header: String,

    #[serde(default = "default_bypass_value")]
    pub bypass_value: String,

    /// Timeout for data endpoints (summary, facilities, boundaries, health)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout for agent endpoints (query, chat, guided query)
    #[serde(default = "default_agent_timeout_ms")]
    pub agent_timeout_ms: u64,

    /// Facilities requested per region
    #[serde(default = "default_facility_limit")]
    pub facility_limit: usize,
}

// Default value functions
fn default_base_url() -> String { "http://localhost:8000".to_string() }
fn default_bypass_header() -> String { "ngrok-skip-browser-warning".to_string() }
fn default_bypass_value() -> String { "1".to_string() }
fn default_timeout_ms() -> u64 { 15_000 }
fn default_agent_timeout_ms() -> u64 { 60_000 }
fn default_facility_limit() -> usize { 200 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bypass_header: default_bypass_header(),
            bypass_value: default_bypass_value(),
            timeout_ms: default_timeout_ms(),
            agent_timeout_ms: default_agent_timeout_ms(),
            facility_limit: default_facility_limit(),
        }
    }
}

impl ApiConfig {
    /// Override with environment variables if present
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("READINESS_API_URL") {
            self.base_url = val;
        }

        if let Ok(val) = std::env::var("READINESS_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("READINESS_AGENT_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.agent_timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("READINESS_FACILITY_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.facility_limit = limit;
            }
        }

        self
    }

    /// Data endpoint timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Agent endpoint timeout as Duration
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
