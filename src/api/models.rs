//! Request and response payloads for the readiness backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Medical service category used to filter regions and facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CSection,
    EmergencySurgery,
    Ultrasound,
}

impl Default for Capability {
    fn default() -> Self {
        Self::CSection
    }
}

impl Capability {
    pub const ALL: [Capability; 3] = [Self::CSection, Self::EmergencySurgery, Self::Ultrasound];

    /// Identifier sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CSection => "c_section",
            Self::EmergencySurgery => "emergency_surgery",
            Self::Ultrasound => "ultrasound",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CSection => "C-section",
            Self::EmergencySurgery => "Emergency surgery",
            Self::Ultrasound => "Ultrasound",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|capability| capability.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown capability '{}', expected one of: c_section, emergency_surgery, ultrasound",
                    s
                )
            })
    }
}

/// Envelope used by list endpoints; a missing array means empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Per-facility readiness for one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Ready,
    Fragile,
    Absent,
}

impl Readiness {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Fragile => "Fragile",
            Self::Absent => "Not Ready",
        }
    }
}

/// Data-quality or capability flag raised on an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentFlag {
    #[serde(rename = "type")]
    pub flag_type: String,
    pub severity: String,
    pub message: String,
}

/// Source citation backing an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub field: String,
    #[serde(rename = "match")]
    pub matched: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub readiness: Readiness,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub missing_required: Vec<String>,
    #[serde(default)]
    pub flags: Vec<AssessmentFlag>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl Assessment {
    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub assessment: Assessment,
}

/// `/api/health` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthResponse {
    /// Any recognizable health payload counts as online
    pub fn is_online(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy") || !self.service.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Answer from `/api/query` and `/api/guided-query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_medical_reasoning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_agent: Option<String>,
}

/// Entry point offered by the guided query panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidedOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub example: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedOptionsResponse {
    #[serde(default)]
    pub options: Vec<GuidedOption>,
}
