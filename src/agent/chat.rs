//! Multi-turn chat with the medical agent

use crate::api::{ApiError, Backend, ChatResponse};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        intent: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sub_agent: Option<String>,
    },
    Error {
        content: String,
        timeout: bool,
    },
}

impl ChatMessage {
    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::Assistant { content, .. } | Self::Error { content, .. } => {
                content
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Conversation transcript and in-flight tracking
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    last_user_message: Option<String>,
    pending: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the last exchange failed and can be retried
    pub fn can_retry(&self) -> bool {
        !self.pending
            && self.last_user_message.is_some()
            && self.messages.last().map_or(false, ChatMessage::is_error)
    }

    /// Record a new user message and return the text to send.
    ///
    /// Blank input and input while a request is pending are ignored.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() || self.pending {
            return None;
        }
        self.messages.push(ChatMessage::User {
            content: message.to_string(),
        });
        self.last_user_message = Some(message.to_string());
        self.pending = true;
        Some(message.to_string())
    }

    /// Drop error entries and return the last user message to resend
    pub fn begin_retry(&mut self) -> Option<String> {
        if self.pending {
            return None;
        }
        let message = self.last_user_message.clone()?;
        self.messages.retain(|m| !m.is_error());
        self.pending = true;
        Some(message)
    }

    /// Apply the outcome of the request started by `begin` or `begin_retry`
    pub fn complete(&mut self, result: Result<ChatResponse, ApiError>) {
        self.pending = false;
        match result {
            Ok(response) => self.messages.push(ChatMessage::Assistant {
                content: response.reply,
                intent: response.intent,
                sub_agent: response.sub_agent,
            }),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.messages.push(ChatMessage::Error {
                    content: e.user_message(),
                    timeout: e.is_timeout(),
                });
            }
        }
    }

    /// Send a message and wait for the reply.
    ///
    /// Returns the last transcript entry, or None if the input was ignored.
    pub async fn send(&mut self, backend: &dyn Backend, input: &str) -> Option<&ChatMessage> {
        let message = self.begin(input)?;
        debug!("Sending chat message ({} chars)", message.len());
        let result = backend.chat(&message).await;
        self.complete(result);
        self.messages.last()
    }

    /// Resend the last user message after a failure
    pub async fn retry(&mut self, backend: &dyn Backend) -> Option<&ChatMessage> {
        let message = self.begin_retry()?;
        let result = backend.chat(&message).await;
        self.complete(result);
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn reply(text: &str) -> ChatResponse {
        ChatResponse {
            reply: text.to_string(),
            intent: Some("facility_lookup".to_string()),
            sub_agent: None,
        }
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut session = ChatSession::new();
        assert!(session.begin("   ").is_none());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_input_while_pending_ignored() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin(" hello ").as_deref(), Some("hello"));
        assert!(session.begin("again").is_none());
        assert!(session.begin_retry().is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_timeout_then_retry() {
        let mut session = ChatSession::new();
        session.begin("Does Korle Bu have an ICU?");
        session.complete(Err(ApiError::Timeout(Duration::from_secs(60))));

        assert!(session.can_retry());
        match session.messages().last() {
            Some(ChatMessage::Error { timeout, .. }) => assert!(*timeout),
            other => panic!("Expected error entry, got {:?}", other),
        }

        assert_eq!(
            session.begin_retry().as_deref(),
            Some("Does Korle Bu have an ICU?")
        );
        assert!(session.messages().iter().all(|m| !m.is_error()));
        session.complete(Ok(reply("Yes")));

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content(), "Yes");
        assert!(!session.can_retry());
    }

    #[test]
    fn test_message_serialization() {
        let message = ChatMessage::Assistant {
            content: "Hi".to_string(),
            intent: None,
            sub_agent: Some("locator".to_string()),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["sub_agent"], "locator");
        assert!(json.get("intent").is_none());
    }
}
