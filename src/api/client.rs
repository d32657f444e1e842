//! Readiness backend client

use super::config::ApiConfig;
use super::models::*;
use crate::geo::parse_boundaries;
use crate::metrics::METRICS;
use crate::reconcile::RegionSummary;
use geojson::FeatureCollection;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Longest slice of an error body kept for display
const ERROR_BODY_LIMIT: usize = 200;

/// Backend client error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Timeouts get a retry affordance in the agent panels
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Short outcome label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::InvalidResponse(_) => "invalid",
            Self::Config(_) => "config",
        }
    }

    /// Message shown inline next to the affected panel
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Failed to connect to the server. Please try again.".to_string(),
            Self::Timeout(_) => {
                "The request timed out. The agent may need more time; please try again.".to_string()
            }
            Self::Status { status, body } if body.is_empty() => format!("API error {}", status),
            Self::Status { status, body } => format!("API error {}: {}", status, body),
            Self::InvalidResponse(detail) => {
                format!("The server returned an unexpected response ({})", detail)
            }
            Self::Config(detail) => format!("Client is misconfigured: {}", detail),
        }
    }

    fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err.to_string())
        }
    }
}

fn truncate(body: &str, limit: usize) -> String {
    body.trim().chars().take(limit).collect()
}

fn looks_like_html(body: &str) -> bool {
    let head: String = body
        .trim_start()
        .chars()
        .take(15)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Decode a JSON body, calling out HTML interstitials separately
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        if looks_like_html(body) {
            ApiError::InvalidResponse(
                "received an HTML page instead of JSON; the tunnel may be showing its browser warning"
                    .to_string(),
            )
        } else {
            ApiError::InvalidResponse(e.to_string())
        }
    })
}

/// Readiness backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: ApiConfig,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !config.bypass_header.is_empty() {
            let name = HeaderName::from_bytes(config.bypass_header.as_bytes())
                .map_err(|e| ApiError::Config(format!("bypass header name: {}", e)))?;
            let value = HeaderValue::from_str(&config.bypass_value)
                .map_err(|e| ApiError::Config(format!("bypass header value: {}", e)))?;
            headers.insert(name, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send a request, time it and read the body as text
    async fn send_text(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<String, ApiError> {
        let start = Instant::now();
        let result = async {
            let response = request
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| ApiError::from_transport(e, timeout))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::from_transport(e, timeout))?;

            if !status.is_success() {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body: truncate(&body, ERROR_BODY_LIMIT),
                });
            }
            Ok::<String, ApiError>(body)
        }
        .await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        METRICS.record_backend_request(endpoint, outcome, start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            warn!("{} request failed: {}", endpoint, e);
        }
        result
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let body = self.send_text(endpoint, request, timeout).await?;
        decode_body(&body).map_err(|e| {
            warn!("{} returned an undecodable body: {}", endpoint, e);
            e
        })
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let request = self.http.get(self.config.url("/api/health"));
        self.send_json("health", request, self.config.timeout()).await
    }

    /// `GET /regions/summary?capability=`
    pub async fn region_summary(
        &self,
        capability: Capability,
    ) -> Result<Vec<RegionSummary>, ApiError> {
        debug!("Fetching region summary for {}", capability);
        let request = self
            .http
            .get(self.config.url("/regions/summary"))
            .query(&[("capability", capability.as_str())]);
        let response: ItemsResponse<RegionSummary> = self
            .send_json("regions_summary", request, self.config.timeout())
            .await?;
        Ok(response.items)
    }

    /// `GET /facilities?capability=&region=&limit=`
    pub async fn facilities(
        &self,
        capability: Capability,
        region: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Facility>, ApiError> {
        let limit = limit.unwrap_or(self.config.facility_limit);
        debug!("Fetching up to {} facilities for {} in '{}'", limit, capability, region);
        let request = self.http.get(self.config.url("/facilities")).query(&[
            ("capability", capability.as_str().to_string()),
            ("region", region.to_string()),
            ("limit", limit.to_string()),
        ]);
        let response: ItemsResponse<Facility> = self
            .send_json("facilities", request, self.config.timeout())
            .await?;
        Ok(response.items)
    }

    /// Boundary collection from `GET /geo/gha_adm1`, or from an absolute URL
    pub async fn boundaries(&self, url: Option<&str>) -> Result<FeatureCollection, ApiError> {
        let url = match url {
            Some(url) => url.to_string(),
            None => self.config.url("/geo/gha_adm1"),
        };
        let request = self.http.get(url);
        let body = self
            .send_text("boundaries", request, self.config.timeout())
            .await?;
        if looks_like_html(&body) {
            return Err(ApiError::InvalidResponse(
                "received an HTML page instead of GeoJSON".to_string(),
            ));
        }
        parse_boundaries(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// `POST /api/query`
    pub async fn query(&self, query: &str) -> Result<QueryResponse, ApiError> {
        let request = self.http.post(self.config.url("/api/query")).json(&QueryRequest {
            query: query.to_string(),
        });
        self.send_json("query", request, self.config.agent_timeout()).await
    }

    /// `POST /api/chat`
    pub async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
        let request = self.http.post(self.config.url("/api/chat")).json(&ChatRequest {
            message: message.to_string(),
        });
        self.send_json("chat", request, self.config.agent_timeout()).await
    }

    /// `GET /api/guided-options`
    pub async fn guided_options(&self) -> Result<Vec<GuidedOption>, ApiError> {
        let request = self.http.get(self.config.url("/api/guided-options"));
        let response: GuidedOptionsResponse = self
            .send_json("guided_options", request, self.config.timeout())
            .await?;
        Ok(response.options)
    }

    /// `POST /api/guided-query`
    pub async fn guided_query(&self, query: &str) -> Result<QueryResponse, ApiError> {
        let request = self
            .http
            .post(self.config.url("/api/guided-query"))
            .json(&QueryRequest {
                query: query.to_string(),
            });
        self.send_json("guided_query", request, self.config.agent_timeout())
            .await
    }
}
