//! # Message Bodies
//!
//! Assistant replies may be a JSON payload with numbered reasoning steps and
//! a final answer. [`MessageBody::resolve`] decides once per message whether
//! that is the case, so renderers never re-parse on every frame.

use serde::Deserialize;

use crate::api::{ChatMessage, Role};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ThoughtStep {
    pub step: u32,
    pub thought: String,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct StructuredPayload {
    thought_process: Vec<ThoughtStep>,
    final_answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Structured {
        steps: Vec<ThoughtStep>,
        final_answer: String,
    },
    PlainText(String),
}

impl MessageBody {
    /// Only assistant messages are candidates for the structured form.
    pub fn resolve(message: &ChatMessage) -> Self {
        match message.role {
            Role::Assistant => Self::parse(&message.content),
            Role::User | Role::System => MessageBody::PlainText(message.content.clone()),
        }
    }

    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if !trimmed.starts_with('{') {
            return MessageBody::PlainText(content.to_string());
        }
        match serde_json::from_str::<StructuredPayload>(trimmed) {
            Ok(payload) => MessageBody::Structured {
                steps: payload.thought_process,
                final_answer: payload.final_answer,
            },
            Err(e) => {
                log::debug!("Assistant content is not a structured payload: {}", e);
                MessageBody::PlainText(content.to_string())
            }
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, MessageBody::Structured { .. })
    }
}

/// Resolves every message of a history in order.
pub fn resolve_all(messages: &[ChatMessage]) -> Vec<MessageBody> {
    messages.iter().map(MessageBody::resolve).collect()
}
