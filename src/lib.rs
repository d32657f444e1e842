//! Capability readiness atlas for Ghana
//!
//! Reconciles region names between boundary data and readiness summaries,
//! builds the choropleth view model, and wraps the readiness backend and its
//! agent endpoints.

pub mod agent;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod facility;
pub mod geo;
pub mod logging;
pub mod metrics;
pub mod reconcile;

pub use api::{ApiConfig, ApiError, Backend, BackendClient, Capability};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState};
pub use error::{Error, Result};
pub use geo::{ChoroplethLayer, GeoSource};
pub use reconcile::{Reconciler, RegionKey, RegionStatus, RegionSummary};
