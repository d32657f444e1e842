//! Backend abstraction consumed by the dashboard and agent panels

use super::client::{ApiError, BackendClient};
use super::models::*;
use crate::reconcile::RegionSummary;
use async_trait::async_trait;
use geojson::FeatureCollection;

/// Operations the dashboard and agent panels need from the backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    async fn region_summary(&self, capability: Capability) -> Result<Vec<RegionSummary>, ApiError>;

    async fn facilities(
        &self,
        capability: Capability,
        region: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Facility>, ApiError>;

    /// Boundary collection from the backend, or from `url` when given
    async fn boundaries(&self, url: Option<&str>) -> Result<FeatureCollection, ApiError>;

    async fn query(&self, query: &str) -> Result<QueryResponse, ApiError>;

    async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError>;

    async fn guided_options(&self) -> Result<Vec<GuidedOption>, ApiError>;

    async fn guided_query(&self, query: &str) -> Result<QueryResponse, ApiError>;
}

#[async_trait]
impl Backend for BackendClient {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        BackendClient::health(self).await
    }

    async fn region_summary(&self, capability: Capability) -> Result<Vec<RegionSummary>, ApiError> {
        BackendClient::region_summary(self, capability).await
    }

    async fn facilities(
        &self,
        capability: Capability,
        region: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Facility>, ApiError> {
        BackendClient::facilities(self, capability, region, limit).await
    }

    async fn boundaries(&self, url: Option<&str>) -> Result<FeatureCollection, ApiError> {
        BackendClient::boundaries(self, url).await
    }

    async fn query(&self, query: &str) -> Result<QueryResponse, ApiError> {
        BackendClient::query(self, query).await
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
        BackendClient::chat(self, message).await
    }

    async fn guided_options(&self) -> Result<Vec<GuidedOption>, ApiError> {
        BackendClient::guided_options(self).await
    }

    async fn guided_query(&self, query: &str) -> Result<QueryResponse, ApiError> {
        BackendClient::guided_query(self, query).await
    }
}
