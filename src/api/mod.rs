//! # Backend API
//!
//! The chat backend owns chats, generation and tool execution. This module
//! holds the wire types, the [`ChatApi`] trait the rest of the app talks to,
//! and the reqwest-based [`HttpChatApi`].

pub mod client;
pub mod http;
pub mod types;

pub use client::{ApiError, ChatApi};
pub use http::HttpChatApi;
pub use types::{Chat, ChatId, ChatMessage, Role, Tool, ToolCreate, ToolId, ToolUpdate};
