//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, Chat, ChatApi, ChatId, ChatMessage, Tool, ToolCreate, ToolId, ToolUpdate,
};
use crate::core::state::App;

/// Creates an empty App with default settings.
pub fn test_app() -> App {
    App::default()
}

/// A chat whose history is each prompt followed by an echoed assistant reply.
pub fn chat_with(id: ChatId, prompts: &[&str]) -> Chat {
    let history = prompts
        .iter()
        .flat_map(|p| [ChatMessage::user(*p), ChatMessage::assistant(format!("re: {p}"))])
        .collect();
    Chat {
        history,
        ..Chat::new(id)
    }
}

pub fn tool(id: ToolId, name: &str) -> Tool {
    Tool {
        id,
        name: name.to_string(),
        description: String::new(),
        extra: Default::default(),
    }
}

/// In-memory backend. Either serves from its own chat/tool lists, or fails
/// every call with the configured error.
#[derive(Default)]
pub struct StubApi {
    chats: Mutex<Vec<Chat>>,
    tools: Mutex<Vec<Tool>>,
    failure: Option<ApiError>,
}

impl StubApi {
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        Self {
            chats: Mutex::new(chats),
            ..Default::default()
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn not_found(what: &str, id: u64) -> ApiError {
        ApiError::Api {
            status: 404,
            message: format!("{what} {id} not found"),
        }
    }

    fn with_chat<T>(&self, id: ChatId, f: impl FnOnce(&mut Chat) -> T) -> Result<T, ApiError> {
        self.check()?;
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("chat", id))?;
        Ok(f(chat))
    }
}

#[async_trait]
impl ChatApi for StubApi {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        self.check()?;
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn get_chat(&self, id: ChatId) -> Result<Chat, ApiError> {
        self.with_chat(id, |c| c.clone())
    }

    async fn create_chat(&self) -> Result<Chat, ApiError> {
        self.check()?;
        let mut chats = self.chats.lock().unwrap();
        let id = chats.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        chats.push(Chat::new(id));
        Ok(Chat::new(id))
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), ApiError> {
        self.with_chat(id, |_| ())?;
        self.chats.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn send_message(&self, id: ChatId, content: &str) -> Result<Chat, ApiError> {
        self.with_chat(id, |c| {
            c.history.push(ChatMessage::user(content));
            c.history.push(ChatMessage::assistant(format!("re: {content}")));
            c.clone()
        })
    }

    async fn clear_history(&self, id: ChatId) -> Result<Chat, ApiError> {
        self.with_chat(id, |c| {
            c.history.clear();
            c.clone()
        })
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, ApiError> {
        self.check()?;
        Ok(self.tools.lock().unwrap().clone())
    }

    async fn create_tool(&self, data: &ToolCreate) -> Result<Tool, ApiError> {
        self.check()?;
        let mut tools = self.tools.lock().unwrap();
        let id = tools.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let created = Tool {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            extra: data.extra.clone(),
        };
        tools.push(created.clone());
        Ok(created)
    }

    async fn update_tool(&self, id: ToolId, data: &ToolUpdate) -> Result<Tool, ApiError> {
        self.check()?;
        let mut tools = self.tools.lock().unwrap();
        let existing = tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("tool", id))?;
        if let Some(name) = &data.name {
            existing.name = name.clone();
        }
        if let Some(description) = &data.description {
            existing.description = description.clone();
        }
        Ok(existing.clone())
    }

    async fn delete_tool(&self, id: ToolId) -> Result<(), ApiError> {
        self.check()?;
        self.tools.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn assign_tool_to_chat(
        &self,
        chat_id: ChatId,
        tool_id: ToolId,
    ) -> Result<Chat, ApiError> {
        self.with_chat(chat_id, |c| {
            c.active_tool_id = Some(tool_id);
            c.clone()
        })
    }
}
