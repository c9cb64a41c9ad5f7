use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ChatId = u64;
pub type ToolId = u64;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            id: None,
        }
    }
}

/// A conversation as the backend knows it. The client only ever holds a cached copy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: ChatId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<ChatMessage>,
    #[serde(
        default,
        deserialize_with = "lenient_tool_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_tool_id: Option<ToolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Chat {
    pub fn new(id: ChatId) -> Self {
        Self {
            id,
            history: Vec::new(),
            active_tool_id: None,
            created_at: None,
        }
    }

    /// First message the user wrote in this chat, if any.
    pub fn first_user_message(&self) -> Option<&ChatMessage> {
        self.history.iter().find(|m| m.role == Role::User)
    }
}

/// `history: null` is treated the same as a missing history.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ChatMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ChatMessage>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend sends `active_tool_id` as a number or as a numeric string.
/// Anything else counts as "no tool".
fn lenient_tool_id<'de, D>(deserializer: D) -> Result<Option<ToolId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A reusable tool configured by the user and executed server-side.
///
/// Fields the client does not interpret are kept in `extra` so that an
/// edit never drops them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ToolCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Partial tool update. Absent fields are left untouched by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ToolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct SendMessageRequest<'a> {
    pub content: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct AssignToolRequest {
    pub tool_id: ToolId,
}
