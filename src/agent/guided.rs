//! Guided query panel
//!
//! Each entry point collects a few named fields and renders them into a
//! natural-language question for `/api/guided-query`.

use super::search::SearchOutcome;
use crate::api::{Backend, GuidedOption};
use std::collections::HashMap;
use tracing::{info, warn};

/// Input collected for a guided option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Fields and query template for one option id
#[derive(Debug, Clone, Copy)]
pub struct GuidedForm {
    pub id: &'static str,
    pub fields: &'static [InputField],
    template: &'static str,
}

const fn field(key: &'static str, label: &'static str, placeholder: &'static str) -> InputField {
    InputField {
        key,
        label,
        placeholder,
    }
}

const FORMS: &[GuidedForm] = &[
    GuidedForm {
        id: "care_near_me",
        fields: &[
            field("care", "Type of care", "e.g., maternity, dialysis"),
            field("city", "City/Location", "e.g., Accra, Kumasi"),
        ],
        template: "I need {care} care, where should I go? I live in {city}",
    },
    GuidedForm {
        id: "gaps",
        fields: &[field("capability", "Capability", "e.g., dialysis, MRI")],
        template: "Which regions lack {capability}?",
    },
    GuidedForm {
        id: "find",
        fields: &[field("care", "Care type", "e.g., maternity care")],
        template: "Facilities with {care}",
    },
    GuidedForm {
        id: "regional",
        fields: &[field("region", "Region", "e.g., Accra, Ashanti")],
        template: "What capabilities exist in {region}?",
    },
    GuidedForm {
        id: "verify",
        fields: &[
            field("facility", "Facility name", "e.g., Korle Bu"),
            field("capability", "Capability", "e.g., dialysis"),
        ],
        template: "Can {facility} do {capability}?",
    },
    GuidedForm {
        id: "custom",
        fields: &[field("query", "Your question", "Type your question...")],
        template: "{query}",
    },
];

impl GuidedForm {
    /// Form for an option id; unknown ids have no form
    pub fn for_option(id: &str) -> Option<&'static GuidedForm> {
        FORMS.iter().find(|form| form.id == id)
    }

    /// True when every field has a non-blank value
    pub fn is_complete(&self, values: &HashMap<String, String>) -> bool {
        self.fields.iter().all(|f| {
            values
                .get(f.key)
                .map_or(false, |value| !value.trim().is_empty())
        })
    }

    /// Render the question, or None while any field is blank.
    ///
    /// Placeholders are filled in one pass over the template; field values
    /// are copied verbatim even when they contain `{...}` themselves.
    pub fn build_query(&self, values: &HashMap<String, String>) -> Option<String> {
        if !self.is_complete(values) {
            return None;
        }
        let mut query = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            query.push_str(&rest[..open]);
            let token = &rest[open + 1..];
            match token.find('}') {
                Some(close) if self.fields.iter().any(|f| f.key == &token[..close]) => {
                    query.push_str(&values[&token[..close]]);
                    rest = &token[close + 1..];
                }
                _ => {
                    query.push('{');
                    rest = token;
                }
            }
        }
        query.push_str(rest);
        Some(query)
    }
}

/// Options offered when the backend list cannot be loaded
pub fn fallback_options() -> Vec<GuidedOption> {
    [
        ("care_near_me", "I need care near me", "Find care by location"),
        ("gaps", "Find gaps", "Where is care missing?"),
        ("find", "Find facilities", "Search by capability"),
        ("regional", "Regional view", "Capabilities by region"),
        ("verify", "Verify a claim", "Can a facility do X?"),
        ("custom", "Custom question", "Ask anything"),
    ]
    .into_iter()
    .map(|(id, label, short)| GuidedOption {
        id: id.to_string(),
        label: label.to_string(),
        short: short.to_string(),
        example: String::new(),
    })
    .collect()
}

/// Load guided options, falling back to the built-in list on failure
pub async fn load_options(backend: &dyn Backend) -> Vec<GuidedOption> {
    match backend.guided_options().await {
        Ok(options) => {
            info!("Loaded {} guided options", options.len());
            options
        }
        Err(e) => {
            warn!("Failed to load guided options, using defaults: {}", e);
            fallback_options()
        }
    }
}

/// Render and submit a guided query.
///
/// Returns None for an unknown option or an incomplete form.
pub async fn submit(
    backend: &dyn Backend,
    option_id: &str,
    values: &HashMap<String, String>,
) -> Option<SearchOutcome> {
    let query = GuidedForm::for_option(option_id)?.build_query(values)?;
    Some(backend.guided_query(&query).await.into())
}
