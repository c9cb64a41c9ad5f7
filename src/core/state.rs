//! # Application State
//!
//! Core business state for tabchat. Domain logic only; no TUI-specific
//! types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── chats: Vec<Chat>                       // directory, as listed by the API
//! ├── open_chats: HashMap<ChatId, ChatState> // one entry per open tab
//! ├── tab_order: Vec<ChatId>                 // always the same set as open_chats
//! ├── active_tab: Option<ChatId>
//! ├── error: Option<String>                  // global banner
//! ├── tools: Vec<Tool>
//! ├── tools_in_flight: usize                 // pending tool operations
//! ├── active_tool: Option<ToolId>
//! └── title_length: usize                    // tab label limit
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::HashMap;

use log::warn;

use crate::api::{ApiError, Chat, ChatId, ChatMessage, Tool, ToolId};
use crate::core::config::ResolvedConfig;
use crate::core::content::{MessageBody, resolve_all};
use crate::core::tabs::{self, DEFAULT_TITLE_LENGTH};

/// Send status of one tab. A send moves `Idle`/`Failed` to `Pending`, and the
/// server's answer moves `Pending` to `Idle` or `Failed`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Exchange {
    #[default]
    Idle,
    /// The user's message is on its way. `preview` is shown but is not history.
    Pending { preview: String },
    /// The last send failed; history is what it was before the send.
    Failed { error: String },
}

/// Live state of an open tab.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub chat: Chat,
    pub messages: Vec<ChatMessage>,
    /// `messages` resolved for rendering, same length and order.
    pub bodies: Vec<MessageBody>,
    pub exchange: Exchange,
    /// Set once when the tab is first opened; orders newly opened tabs.
    pub opened_seq: u64,
    /// Stamp of the last server copy installed through `App`. Unique across
    /// tabs and reopenings, so a refresh can tell whether it is stale.
    pub revision: u64,
}

impl ChatState {
    pub fn new(chat: Chat, opened_seq: u64) -> Self {
        let mut state = Self {
            chat: Chat::new(chat.id),
            messages: Vec::new(),
            bodies: Vec::new(),
            exchange: Exchange::Idle,
            opened_seq,
            revision: 0,
        };
        state.install(chat);
        state
    }

    /// Replace the cached chat with a server copy. History is taken wholesale.
    pub fn install(&mut self, chat: Chat) {
        self.messages = chat.history.clone();
        self.bodies = resolve_all(&self.messages);
        self.chat = chat;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.exchange, Exchange::Pending { .. })
    }

    pub fn preview_message(&self) -> Option<&str> {
        match &self.exchange {
            Exchange::Pending { preview } => Some(preview),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.exchange {
            Exchange::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// A tab as the tab strip sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct TabLabel {
    pub id: ChatId,
    pub title: String,
    pub is_active: bool,
    pub is_loading: bool,
}

pub struct App {
    pub chats: Vec<Chat>,
    pub open_chats: HashMap<ChatId, ChatState>,
    pub tab_order: Vec<ChatId>,
    pub active_tab: Option<ChatId>,
    pub error: Option<String>,
    pub tools: Vec<Tool>,
    pub tools_in_flight: usize,
    pub active_tool: Option<ToolId>,
    pub title_length: usize,
    next_open_seq: u64,
    next_revision: u64,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_LENGTH)
    }
}

impl App {
    pub fn new(title_length: usize) -> Self {
        Self {
            chats: Vec::new(),
            open_chats: HashMap::new(),
            tab_order: Vec::new(),
            active_tab: None,
            error: None,
            tools: Vec::new(),
            tools_in_flight: 0,
            active_tool: None,
            title_length,
            next_open_seq: 0,
            next_revision: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.title_length)
    }

    pub fn is_open(&self, id: ChatId) -> bool {
        self.open_chats.contains_key(&id)
    }

    pub fn active_chat_state(&self) -> Option<&ChatState> {
        self.active_tab.and_then(|id| self.open_chats.get(&id))
    }

    pub fn loading_tools(&self) -> bool {
        self.tools_in_flight > 0
    }

    pub fn tab_labels(&self) -> Vec<TabLabel> {
        self.tab_order
            .iter()
            .map(|id| {
                let state = self.open_chats.get(id);
                TabLabel {
                    id: *id,
                    title: state
                        .map(|s| tabs::derive_title(&s.chat, self.title_length))
                        .unwrap_or_else(|| format!("Chat {id}")),
                    is_active: self.active_tab == Some(*id),
                    is_loading: state.is_some_and(ChatState::is_loading),
                }
            })
            .collect()
    }

    /// Open tabs in tab order.
    pub fn ordered_tabs(&self) -> impl Iterator<Item = &ChatState> {
        self.tab_order.iter().filter_map(|id| self.open_chats.get(id))
    }

    pub fn set_error(&mut self, context: &str, err: &ApiError) {
        warn!("{}: {}", context, err);
        self.error = Some(format!("{context}: {err}"));
    }

    /// Insert or overwrite the tab for `chat`. An already open tab keeps its
    /// position and sequence number.
    pub(crate) fn upsert_tab(&mut self, chat: Chat) {
        let id = chat.id;
        let opened_seq = match self.open_chats.get(&id) {
            Some(existing) => existing.opened_seq,
            None => {
                self.next_open_seq += 1;
                self.next_open_seq
            }
        };
        let mut state = ChatState::new(chat, opened_seq);
        state.revision = self.bump_revision();
        self.open_chats.insert(id, state);
        self.reconcile_tabs();
    }

    /// Install a server copy into the chat's open tab, if there is one.
    pub(crate) fn install_chat(&mut self, chat: Chat) -> Option<&mut ChatState> {
        let revision = self.bump_revision();
        let state = self.open_chats.get_mut(&chat.id)?;
        state.install(chat);
        state.revision = revision;
        Some(state)
    }

    /// `(id, revision)` of every open tab, in tab order.
    pub(crate) fn tab_revisions(&self) -> Vec<(ChatId, u64)> {
        self.ordered_tabs()
            .map(|state| (state.chat.id, state.revision))
            .collect()
    }

    fn bump_revision(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }

    /// Remove a tab. Returns false if it was not open.
    pub(crate) fn remove_tab(&mut self, id: ChatId) -> bool {
        if self.open_chats.remove(&id).is_none() {
            return false;
        }
        let position = self.tab_order.iter().position(|t| *t == id);
        self.reconcile_tabs();

        if self.active_tab == Some(id) {
            self.active_tab = position
                .and_then(|index| tabs::fallback_index(index, self.tab_order.len()))
                .map(|index| self.tab_order[index]);
        }
        self.sync_active_tool();
        true
    }

    pub(crate) fn reconcile_tabs(&mut self) {
        let open: Vec<(ChatId, u64)> = self
            .open_chats
            .iter()
            .map(|(id, state)| (*id, state.opened_seq))
            .collect();
        self.tab_order = tabs::reconcile_tab_order(&self.tab_order, &open);
    }

    /// Replace the directory entry with the same id, if there is one.
    pub(crate) fn refresh_directory_entry(&mut self, chat: &Chat) {
        if let Some(entry) = self.chats.iter_mut().find(|c| c.id == chat.id) {
            *entry = chat.clone();
        }
    }

    /// Re-derive `active_tool` from the active tab's chat.
    pub(crate) fn sync_active_tool(&mut self) {
        self.active_tool = self
            .active_chat_state()
            .and_then(|state| state.chat.active_tool_id);
    }
}
