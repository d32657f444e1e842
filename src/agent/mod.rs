//! Agent panels: chat, single-question search, guided queries and the
//! backend status indicator.

pub mod chat;
pub mod guided;
pub mod health;
pub mod search;

pub use chat::{ChatMessage, ChatSession};
pub use guided::{fallback_options, load_options, submit, GuidedForm, InputField};
pub use health::{ApiStatus, HealthStatus};
pub use search::{search, SearchOutcome};
