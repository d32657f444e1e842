//! Single-question agent search

use crate::api::{ApiError, Backend, QueryResponse};
use tracing::{debug, warn};

/// Search panel outcome
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Answer(QueryResponse),
    Failed { message: String, timeout: bool },
}

impl From<Result<QueryResponse, ApiError>> for SearchOutcome {
    fn from(result: Result<QueryResponse, ApiError>) -> Self {
        match result {
            Ok(response) => Self::Answer(response),
            Err(e) => {
                warn!("Agent query failed: {}", e);
                Self::Failed {
                    message: e.user_message(),
                    timeout: e.is_timeout(),
                }
            }
        }
    }
}

/// Ask the agent one question. Blank queries are not sent.
pub async fn search(backend: &dyn Backend, query: &str) -> Option<SearchOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    debug!("Agent query: {}", query);
    Some(backend.query(query).await.into())
}
