use std::fmt;

use async_trait::async_trait;

use super::types::{Chat, ChatId, Tool, ToolCreate, ToolId, ToolUpdate};

/// Errors returned by a [`ChatApi`] call.
///
/// `Display` output is what ends up in the UI's error slots, so every
/// variant reads as a sentence fragment a user can act on.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Could not reach the backend (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Backend answered 2xx but the body was not what we expected.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => write!(f, "HTTP {status}: {message}"),
            ApiError::Parse(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The backend contract. It owns persistence, generation and tool execution;
/// the client only mirrors what these calls return.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError>;

    async fn get_chat(&self, id: ChatId) -> Result<Chat, ApiError>;

    async fn create_chat(&self) -> Result<Chat, ApiError>;

    async fn delete_chat(&self, id: ChatId) -> Result<(), ApiError>;

    /// Sends a user message and returns the full updated chat,
    /// including the new assistant turn.
    async fn send_message(&self, id: ChatId, content: &str) -> Result<Chat, ApiError>;

    async fn clear_history(&self, id: ChatId) -> Result<Chat, ApiError>;

    async fn list_tools(&self) -> Result<Vec<Tool>, ApiError>;

    async fn create_tool(&self, data: &ToolCreate) -> Result<Tool, ApiError>;

    async fn update_tool(&self, id: ToolId, data: &ToolUpdate) -> Result<Tool, ApiError>;

    async fn delete_tool(&self, id: ToolId) -> Result<(), ApiError>;

    async fn assign_tool_to_chat(&self, chat_id: ChatId, tool_id: ToolId)
        -> Result<Chat, ApiError>;
}
