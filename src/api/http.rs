//! `ChatApi` over HTTP/JSON.
//!
//! Route layout:
//!
//! ```text
//! GET    /chats                 list
//! POST   /chats                 create
//! GET    /chats/{id}            fetch one
//! DELETE /chats/{id}            delete
//! POST   /chats/{id}/messages   {"content": ...}  -> updated chat
//! POST   /chats/{id}/clear      -> updated chat
//! POST   /chats/{id}/tool       {"tool_id": ...}  -> updated chat
//! GET    /tools                 list
//! POST   /tools                 create
//! PUT    /tools/{id}            partial update
//! DELETE /tools/{id}            delete
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::client::{ApiError, ChatApi};
use super::types::{
    AssignToolRequest, Chat, ChatId, SendMessageRequest, Tool, ToolCreate, ToolId, ToolUpdate,
};

pub struct HttpChatApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build configured HTTP client ({e}), falling back to defaults");
            reqwest::Client::new()
        });

        info!("Chat API client targeting {}", base_url);
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns transport failures and non-2xx statuses into `ApiError`.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} -> {}", response.url().path(), status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Chat API error: {} - {}", status.as_u16(), body);
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "unknown error".to_string());
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Pulls a readable message out of an error body.
/// Prefers a JSON `detail` or `message` string, falls back to the raw text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }
    Some(trimmed.to_string())
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        self.json(self.client.get(self.url("/chats"))).await
    }

    async fn get_chat(&self, id: ChatId) -> Result<Chat, ApiError> {
        self.json(self.client.get(self.url(&format!("/chats/{id}"))))
            .await
    }

    async fn create_chat(&self) -> Result<Chat, ApiError> {
        self.json(self.client.post(self.url("/chats"))).await
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), ApiError> {
        self.execute(self.client.delete(self.url(&format!("/chats/{id}"))))
            .await
            .map(|_| ())
    }

    async fn send_message(&self, id: ChatId, content: &str) -> Result<Chat, ApiError> {
        info!("Sending message to chat {} ({} bytes)", id, content.len());
        let body = SendMessageRequest { content };
        self.json(
            self.client
                .post(self.url(&format!("/chats/{id}/messages")))
                .json(&body),
        )
        .await
    }

    async fn clear_history(&self, id: ChatId) -> Result<Chat, ApiError> {
        self.json(self.client.post(self.url(&format!("/chats/{id}/clear"))))
            .await
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, ApiError> {
        self.json(self.client.get(self.url("/tools"))).await
    }

    async fn create_tool(&self, data: &ToolCreate) -> Result<Tool, ApiError> {
        self.json(self.client.post(self.url("/tools")).json(data))
            .await
    }

    async fn update_tool(&self, id: ToolId, data: &ToolUpdate) -> Result<Tool, ApiError> {
        self.json(
            self.client
                .put(self.url(&format!("/tools/{id}")))
                .json(data),
        )
        .await
    }

    async fn delete_tool(&self, id: ToolId) -> Result<(), ApiError> {
        self.execute(self.client.delete(self.url(&format!("/tools/{id}"))))
            .await
            .map(|_| ())
    }

    async fn assign_tool_to_chat(
        &self,
        chat_id: ChatId,
        tool_id: ToolId,
    ) -> Result<Chat, ApiError> {
        let body = AssignToolRequest { tool_id };
        self.json(
            self.client
                .post(self.url(&format!("/chats/{chat_id}/tool")))
                .json(&body),
        )
        .await
    }
}
