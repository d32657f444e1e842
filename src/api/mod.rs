//! Readiness backend API
//!
//! Typed client for the endpoints the dashboard consumes:
//! - GET /regions/summary - Region readiness per capability
//! - GET /facilities - Facility assessments for one region
//! - GET /geo/gha_adm1 - Administrative boundaries
//! - GET /api/health - Service health
//! - POST /api/query, /api/chat, /api/guided-query - Agent endpoints
//! - GET /api/guided-options - Guided query entry points

pub mod backend;
pub mod client;
pub mod config;
pub mod models;

pub use backend::Backend;
pub use client::{ApiError, BackendClient};
pub use config::ApiConfig;
pub use models::{
    Assessment, AssessmentFlag, Capability, ChatResponse, Evidence, Facility, GuidedOption,
    HealthResponse, QueryResponse, Readiness,
};
