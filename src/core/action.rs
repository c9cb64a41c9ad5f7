//! # Actions
//!
//! Everything that can happen in tabchat becomes an `Action`.
//! User presses Enter? That's `Action::SendMessage`.
//! API responds? That's `Action::MessageSent { .. }`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns an [`Effect`] describing the I/O that should happen next. No side
//! effects here. The TUI runs the effect and feeds its outcome back as
//! another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//!                                              │
//!                         ChatApi call  ◄──────┘
//!                              │
//!                    result Action  →  update()  →  ...
//! ```
//!
//! Optimistic updates are two-phase: the request action marks the affected
//! state as pending, the result action confirms or rolls back.

use log::{debug, info, warn};

use crate::api::{ApiError, Chat, ChatId, Tool, ToolCreate, ToolId, ToolUpdate};
use crate::core::state::{App, Exchange};
use crate::core::tabs;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Directory
    LoadChats,
    ChatsLoaded(Result<Vec<Chat>, ApiError>),
    /// Server copies of open chats, each with the tab revision it was requested at.
    OpenChatsRefreshed(Vec<(u64, Chat)>),
    CreateChat,
    ChatCreated(Result<Chat, ApiError>),
    DeleteChat(ChatId),
    ChatDeleted {
        id: ChatId,
        result: Result<(), ApiError>,
    },
    ClearHistory(ChatId),
    HistoryCleared {
        id: ChatId,
        result: Result<Chat, ApiError>,
    },

    // Tabs
    OpenChat(ChatId),
    ChatOpened(Result<Chat, ApiError>),
    SelectTab(ChatId),
    /// Move the active tab by this many positions, wrapping around.
    CycleTab(isize),
    CloseTab(ChatId),
    ReorderTabs { from: usize, to: usize },

    // Message exchange
    SendMessage { chat_id: ChatId, content: String },
    MessageSent {
        chat_id: ChatId,
        result: Result<Chat, ApiError>,
    },

    // Tools
    LoadTools,
    ToolsLoaded(Result<Vec<Tool>, ApiError>),
    CreateTool(ToolCreate),
    ToolCreated(Result<Tool, ApiError>),
    UpdateTool { id: ToolId, update: ToolUpdate },
    ToolUpdated {
        id: ToolId,
        result: Result<Tool, ApiError>,
    },
    DeleteTool(ToolId),
    ToolDeleted {
        id: ToolId,
        result: Result<(), ApiError>,
    },
    AssignTool { chat_id: ChatId, tool_id: ToolId },
    ToolAssigned {
        chat_id: ChatId,
        tool_id: ToolId,
        result: Result<Chat, ApiError>,
    },

    DismissError,
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchChats,
    /// Re-fetch these open chats concurrently. Each id carries its tab's
    /// revision so results that arrive after a newer install are dropped.
    RefreshChats(Vec<(ChatId, u64)>),
    FetchChat(ChatId),
    CreateChat,
    DeleteChat(ChatId),
    ClearHistory(ChatId),
    SendMessage { chat_id: ChatId, content: String },
    FetchTools,
    CreateTool(ToolCreate),
    UpdateTool { id: ToolId, update: ToolUpdate },
    DeleteTool(ToolId),
    AssignTool { chat_id: ChatId, tool_id: ToolId },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::LoadChats => Effect::FetchChats,
        Action::ChatsLoaded(Ok(chats)) => {
            info!("Directory loaded: {} chats", chats.len());
            app.chats = chats;
            if app.tab_order.is_empty() {
                Effect::None
            } else {
                Effect::RefreshChats(app.tab_revisions())
            }
        }
        Action::ChatsLoaded(Err(e)) => {
            app.set_error("Failed to load chats", &e);
            Effect::None
        }
        Action::OpenChatsRefreshed(chats) => {
            for (revision, chat) in chats {
                match app.open_chats.get(&chat.id) {
                    None => debug!("Dropping refresh for closed chat {}", chat.id),
                    Some(state) if state.revision != revision || state.is_loading() => {
                        debug!("Dropping stale refresh for chat {}", chat.id);
                    }
                    Some(_) => {
                        app.refresh_directory_entry(&chat);
                        app.install_chat(chat);
                    }
                }
            }
            app.sync_active_tool();
            Effect::None
        }
        Action::CreateChat => Effect::CreateChat,
        Action::ChatCreated(Ok(chat)) => {
            let id = chat.id;
            if !app.chats.iter().any(|c| c.id == id) {
                app.chats.push(chat);
            }
            Effect::FetchChat(id)
        }
        Action::ChatCreated(Err(e)) => {
            app.set_error("Failed to create chat", &e);
            Effect::None
        }
        Action::DeleteChat(id) => Effect::DeleteChat(id),
        Action::ChatDeleted { id, result: Ok(()) } => {
            app.chats.retain(|c| c.id != id);
            if app.remove_tab(id) {
                info!("Deleted chat {} and closed its tab", id);
            }
            Effect::None
        }
        Action::ChatDeleted { result: Err(e), .. } => {
            app.set_error("Failed to delete chat", &e);
            Effect::None
        }
        Action::ClearHistory(id) => Effect::ClearHistory(id),
        Action::HistoryCleared { result: Ok(chat), .. } => {
            app.refresh_directory_entry(&chat);
            app.install_chat(chat);
            app.sync_active_tool();
            Effect::None
        }
        Action::HistoryCleared { result: Err(e), .. } => {
            app.set_error("Failed to clear history", &e);
            Effect::None
        }

        Action::OpenChat(id) => Effect::FetchChat(id),
        Action::ChatOpened(Ok(chat)) => {
            let id = chat.id;
            app.refresh_directory_entry(&chat);
            app.upsert_tab(chat);
            app.active_tab = Some(id);
            app.sync_active_tool();
            Effect::None
        }
        Action::ChatOpened(Err(e)) => {
            app.set_error("Failed to open chat", &e);
            Effect::None
        }
        Action::SelectTab(id) => {
            if app.is_open(id) {
                app.active_tab = Some(id);
                app.sync_active_tool();
            }
            Effect::None
        }
        Action::CycleTab(delta) => {
            if let Some(next) = cycled_tab(app, delta) {
                app.active_tab = Some(next);
                app.sync_active_tool();
            }
            Effect::None
        }
        Action::CloseTab(id) => {
            app.remove_tab(id);
            Effect::None
        }
        Action::ReorderTabs { from, to } => {
            if !tabs::move_tab(&mut app.tab_order, from, to) {
                debug!("Ignoring tab move {} -> {}", from, to);
            }
            Effect::None
        }

        Action::SendMessage { chat_id, content } => {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Effect::None;
            }
            let Some(state) = app.open_chats.get_mut(&chat_id) else {
                warn!("SendMessage for chat {} which has no open tab", chat_id);
                return Effect::None;
            };
            if state.is_loading() {
                debug!("Chat {} already has a message in flight", chat_id);
                return Effect::None;
            }
            state.exchange = Exchange::Pending {
                preview: content.clone(),
            };
            Effect::SendMessage { chat_id, content }
        }
        Action::MessageSent { chat_id, result } => {
            match result {
                Ok(chat) => {
                    app.refresh_directory_entry(&chat);
                    match app.install_chat(chat) {
                        Some(state) => state.exchange = Exchange::Idle,
                        None => debug!("Discarding reply for closed chat {}", chat_id),
                    }
                    app.sync_active_tool();
                }
                Err(e) => {
                    warn!("Send to chat {} failed: {}", chat_id, e);
                    match app.open_chats.get_mut(&chat_id) {
                        Some(state) => {
                            state.exchange = Exchange::Failed {
                                error: e.to_string(),
                            };
                        }
                        None => debug!("Discarding send error for closed chat {}", chat_id),
                    }
                }
            }
            Effect::None
        }

        Action::LoadTools => {
            app.tools_in_flight += 1;
            Effect::FetchTools
        }
        Action::ToolsLoaded(result) => {
            finish_tool_op(app);
            match result {
                Ok(tools) => app.tools = tools,
                Err(e) => app.set_error("Failed to load tools", &e),
            }
            Effect::None
        }
        Action::CreateTool(data) => {
            if data.name.trim().is_empty() {
                debug!("Ignoring tool without a name");
                return Effect::None;
            }
            app.tools_in_flight += 1;
            Effect::CreateTool(data)
        }
        Action::ToolCreated(result) => {
            finish_tool_op(app);
            match result {
                Ok(tool) => match app.tools.iter_mut().find(|t| t.id == tool.id) {
                    Some(existing) => *existing = tool,
                    None => app.tools.push(tool),
                },
                Err(e) => app.set_error("Failed to create tool", &e),
            }
            Effect::None
        }
        Action::UpdateTool { id, update } => {
            if update.is_empty() {
                return Effect::None;
            }
            app.tools_in_flight += 1;
            Effect::UpdateTool { id, update }
        }
        Action::ToolUpdated { id, result } => {
            finish_tool_op(app);
            match result {
                Ok(tool) => {
                    for t in app.tools.iter_mut().filter(|t| t.id == id) {
                        *t = tool.clone();
                    }
                }
                Err(e) => app.set_error("Failed to update tool", &e),
            }
            Effect::None
        }
        Action::DeleteTool(id) => {
            app.tools_in_flight += 1;
            Effect::DeleteTool(id)
        }
        Action::ToolDeleted { id, result } => {
            finish_tool_op(app);
            match result {
                Ok(()) => app.tools.retain(|t| t.id != id),
                Err(e) => app.set_error("Failed to delete tool", &e),
            }
            Effect::None
        }
        Action::AssignTool { chat_id, tool_id } => Effect::AssignTool { chat_id, tool_id },
        Action::ToolAssigned {
            chat_id,
            tool_id,
            result,
        } => {
            match result {
                Ok(chat) => {
                    app.refresh_directory_entry(&chat);
                    app.install_chat(chat);
                    app.active_tool = Some(tool_id);
                    info!("Assigned tool {} to chat {}", tool_id, chat_id);
                }
                Err(e) => app.set_error("Failed to assign tool", &e),
            }
            Effect::None
        }

        Action::DismissError => {
            app.error = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Clears one unit of the tool loading flag. Runs before the result is inspected.
fn finish_tool_op(app: &mut App) {
    app.tools_in_flight = app.tools_in_flight.saturating_sub(1);
}

fn cycled_tab(app: &App, delta: isize) -> Option<ChatId> {
    let len = app.tab_order.len() as isize;
    if len == 0 {
        return None;
    }
    let current = app
        .active_tab
        .and_then(|id| app.tab_order.iter().position(|t| *t == id))
        .unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(len) as usize;
    app.tab_order.get(next).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ToolCreate;
    use crate::test_support::{chat_with, test_app, tool};

    fn api_err(message: &str) -> ApiError {
        ApiError::Api {
            status: 500,
            message: message.to_string(),
        }
    }

    /// Runs the open round-trip without the network.
    fn open(app: &mut App, chat: Chat) {
        assert_eq!(update(app, Action::OpenChat(chat.id)), Effect::FetchChat(chat.id));
        assert_eq!(update(app, Action::ChatOpened(Ok(chat))), Effect::None);
    }

    fn app_with_directory(ids: &[ChatId]) -> App {
        let mut app = test_app();
        let chats = ids.iter().map(|id| Chat::new(*id)).collect();
        update(&mut app, Action::ChatsLoaded(Ok(chats)));
        app
    }

    // ======================================================================
    // Tabs
    // ======================================================================

    #[test]
    fn test_open_then_close_falls_back_to_remaining_tab() {
        let mut app = app_with_directory(&[1, 2]);
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        assert_eq!(app.tab_order, vec![1, 2]);
        assert_eq!(app.active_tab, Some(2));

        update(&mut app, Action::SelectTab(1));
        update(&mut app, Action::CloseTab(1));

        assert_eq!(app.tab_order, vec![2]);
        assert_eq!(app.active_tab, Some(2));
        assert_eq!(app.chats.len(), 2, "closing a tab keeps the directory");
    }

    #[test]
    fn test_open_then_close_inactive_keeps_active() {
        let mut app = app_with_directory(&[1, 2]);
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        update(&mut app, Action::CloseTab(1));
        assert_eq!(app.tab_order, vec![2]);
        assert_eq!(app.active_tab, Some(2));
    }

    #[test]
    fn test_opening_twice_does_not_duplicate() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, Chat::new(1));
        open(&mut app, chat_with(1, &["fresh"]));
        assert_eq!(app.tab_order, vec![1]);
        assert_eq!(app.open_chats[&1].messages.len(), 2);
    }

    #[test]
    fn test_closing_last_tab_clears_active() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, Chat::new(1));
        update(&mut app, Action::CloseTab(1));
        assert!(app.tab_order.is_empty());
        assert_eq!(app.active_tab, None);
        assert_eq!(app.active_tool, None);
    }

    #[test]
    fn test_closing_active_last_position_falls_back_left() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        open(&mut app, Chat::new(3));
        update(&mut app, Action::CloseTab(3));
        assert_eq!(app.active_tab, Some(2));
    }

    #[test]
    fn test_closing_active_middle_activates_next() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        open(&mut app, Chat::new(3));
        update(&mut app, Action::SelectTab(2));
        update(&mut app, Action::CloseTab(2));
        assert_eq!(app.tab_order, vec![1, 3]);
        assert_eq!(app.active_tab, Some(3));
    }

    #[test]
    fn test_tab_order_after_mixed_opens_and_closes() {
        let mut app = test_app();
        for id in [4, 2, 9] {
            open(&mut app, Chat::new(id));
        }
        update(&mut app, Action::ReorderTabs { from: 2, to: 0 });
        assert_eq!(app.tab_order, vec![9, 4, 2]);

        update(&mut app, Action::CloseTab(4));
        open(&mut app, Chat::new(7));
        open(&mut app, Chat::new(4));
        assert_eq!(app.tab_order, vec![9, 2, 7, 4]);
    }

    #[test]
    fn test_open_failure_sets_global_error_only() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, Chat::new(1));
        update(&mut app, Action::ChatOpened(Err(api_err("gone"))));
        assert_eq!(app.tab_order, vec![1]);
        assert_eq!(app.error.as_deref(), Some("Failed to open chat: HTTP 500: gone"));
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        update(&mut app, Action::ReorderTabs { from: 0, to: 8 });
        assert_eq!(app.tab_order, vec![1, 2]);
    }

    #[test]
    fn test_cycle_tab_wraps() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        update(&mut app, Action::CycleTab(1));
        assert_eq!(app.active_tab, Some(1));
        update(&mut app, Action::CycleTab(-1));
        assert_eq!(app.active_tab, Some(2));
    }

    #[test]
    fn test_select_unknown_tab_ignored() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        update(&mut app, Action::SelectTab(42));
        assert_eq!(app.active_tab, Some(1));
    }

    // ======================================================================
    // Directory
    // ======================================================================

    #[test]
    fn test_delete_chat_closes_open_tab() {
        let mut app = app_with_directory(&[1, 2]);
        open(&mut app, Chat::new(1));
        assert_eq!(update(&mut app, Action::DeleteChat(1)), Effect::DeleteChat(1));
        update(&mut app, Action::ChatDeleted { id: 1, result: Ok(()) });

        assert_eq!(app.chats.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        assert!(!app.is_open(1));
        assert_eq!(app.active_tab, None);
    }

    #[test]
    fn test_delete_failure_changes_nothing() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, Chat::new(1));
        update(
            &mut app,
            Action::ChatDeleted {
                id: 1,
                result: Err(api_err("locked")),
            },
        );
        assert_eq!(app.chats.len(), 1);
        assert!(app.is_open(1));
        assert!(app.error.as_deref().unwrap().starts_with("Failed to delete chat"));
    }

    #[test]
    fn test_chats_loaded_refreshes_open_tabs() {
        let mut app = test_app();
        open(&mut app, Chat::new(3));
        let effect = update(&mut app, Action::ChatsLoaded(Ok(vec![Chat::new(3)])));
        let revision = app.open_chats[&3].revision;
        assert_eq!(effect, Effect::RefreshChats(vec![(3, revision)]));

        app.open_chats.get_mut(&3).unwrap().exchange = Exchange::Failed {
            error: "old".into(),
        };
        update(
            &mut app,
            Action::OpenChatsRefreshed(vec![(revision, chat_with(3, &["x"]))]),
        );
        let state = &app.open_chats[&3];
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.error(), Some("old"), "refresh keeps the exchange status");
        assert_eq!(app.chats[0].history.len(), 2);
    }

    #[test]
    fn test_refresh_older_than_send_reply_is_dropped() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        let Effect::RefreshChats(requested) =
            update(&mut app, Action::ChatsLoaded(Ok(vec![Chat::new(1)])))
        else {
            panic!("expected a refresh of the open tab");
        };
        let (_, revision) = requested[0];

        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "hi".into(),
            },
        );
        update(
            &mut app,
            Action::MessageSent {
                chat_id: 1,
                result: Ok(chat_with(1, &["hi"])),
            },
        );

        // The refresh GET went out before the send and resolves last
        update(
            &mut app,
            Action::OpenChatsRefreshed(vec![(revision, Chat::new(1))]),
        );
        assert_eq!(app.open_chats[&1].messages.len(), 2);
        assert_eq!(app.chats[0].history.len(), 2);
    }

    #[test]
    fn test_refresh_skips_tab_with_send_in_flight() {
        let mut app = test_app();
        open(&mut app, chat_with(1, &["before"]));
        let revision = app.open_chats[&1].revision;
        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "hi".into(),
            },
        );

        update(
            &mut app,
            Action::OpenChatsRefreshed(vec![(revision, Chat::new(1))]),
        );
        let state = &app.open_chats[&1];
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.preview_message(), Some("hi"));
    }

    #[test]
    fn test_chats_loaded_without_tabs_needs_no_refresh() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::ChatsLoaded(Ok(vec![]))), Effect::None);
    }

    #[test]
    fn test_create_chat_appends_and_opens() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CreateChat), Effect::CreateChat);
        let effect = update(&mut app, Action::ChatCreated(Ok(Chat::new(11))));
        assert_eq!(effect, Effect::FetchChat(11));
        assert_eq!(app.chats.len(), 1);
    }

    #[test]
    fn test_clear_history_updates_open_tab() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, chat_with(1, &["a", "b"]));
        update(
            &mut app,
            Action::HistoryCleared {
                id: 1,
                result: Ok(Chat::new(1)),
            },
        );
        assert!(app.open_chats[&1].messages.is_empty());
    }

    #[test]
    fn test_dismiss_error() {
        let mut app = test_app();
        update(&mut app, Action::ChatsLoaded(Err(api_err("down"))));
        assert!(app.error.is_some());
        update(&mut app, Action::DismissError);
        assert!(app.error.is_none());
    }

    // ======================================================================
    // Message exchange
    // ======================================================================

    #[test]
    fn test_send_marks_pending_with_preview() {
        let mut app = test_app();
        open(&mut app, chat_with(1, &["first"]));
        let effect = update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "  second  ".into(),
            },
        );
        assert_eq!(
            effect,
            Effect::SendMessage {
                chat_id: 1,
                content: "second".into()
            }
        );
        let state = &app.open_chats[&1];
        assert!(state.is_loading());
        assert_eq!(state.preview_message(), Some("second"));
        assert_eq!(state.messages.len(), 2, "preview is not history");
    }

    #[test]
    fn test_send_success_replaces_history_with_server_copy() {
        let mut app = test_app();
        open(&mut app, chat_with(1, &["first"]));
        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "second".into(),
            },
        );
        let server = chat_with(1, &["first", "second"]);
        update(
            &mut app,
            Action::MessageSent {
                chat_id: 1,
                result: Ok(server.clone()),
            },
        );
        let state = &app.open_chats[&1];
        assert_eq!(state.messages, server.history);
        assert_eq!(state.exchange, Exchange::Idle);
    }

    #[test]
    fn test_send_failure_rolls_back() {
        let mut app = test_app();
        open(&mut app, chat_with(1, &["first"]));
        let before = app.open_chats[&1].messages.clone();
        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "second".into(),
            },
        );
        update(
            &mut app,
            Action::MessageSent {
                chat_id: 1,
                result: Err(api_err("model overloaded")),
            },
        );
        let state = &app.open_chats[&1];
        assert_eq!(state.messages, before);
        assert!(!state.is_loading());
        assert_eq!(state.preview_message(), None);
        assert_eq!(state.error(), Some("HTTP 500: model overloaded"));
        assert!(app.error.is_none(), "send errors stay in the tab");
    }

    #[test]
    fn test_send_ignored_while_pending_or_empty() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        let send = |content: &str| Action::SendMessage {
            chat_id: 1,
            content: content.into(),
        };
        assert_eq!(update(&mut app, send("   ")), Effect::None);
        assert_ne!(update(&mut app, send("one")), Effect::None);
        assert_eq!(update(&mut app, send("two")), Effect::None);
        assert_eq!(app.open_chats[&1].preview_message(), Some("one"));
    }

    #[test]
    fn test_new_send_clears_previous_error() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        app.open_chats.get_mut(&1).unwrap().exchange = Exchange::Failed {
            error: "earlier".into(),
        };
        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "retry".into(),
            },
        );
        assert_eq!(app.open_chats[&1].error(), None);
    }

    #[test]
    fn test_reply_for_closed_tab_is_discarded() {
        let mut app = app_with_directory(&[1]);
        open(&mut app, Chat::new(1));
        update(
            &mut app,
            Action::SendMessage {
                chat_id: 1,
                content: "hello".into(),
            },
        );
        update(&mut app, Action::CloseTab(1));
        update(
            &mut app,
            Action::MessageSent {
                chat_id: 1,
                result: Ok(chat_with(1, &["hello"])),
            },
        );
        assert!(!app.is_open(1));
        assert!(app.tab_order.is_empty());
    }

    #[test]
    fn test_concurrent_sends_tracked_per_tab() {
        let mut app = test_app();
        open(&mut app, Chat::new(1));
        open(&mut app, Chat::new(2));
        for id in [1, 2] {
            update(
                &mut app,
                Action::SendMessage {
                    chat_id: id,
                    content: format!("to {id}"),
                },
            );
        }
        update(
            &mut app,
            Action::MessageSent {
                chat_id: 2,
                result: Err(api_err("nope")),
            },
        );
        assert!(app.open_chats[&1].is_loading());
        assert!(app.open_chats[&2].error().is_some());
    }

    // ======================================================================
    // Tools
    // ======================================================================

    #[test]
    fn test_tool_crud_updates_list_by_id() {
        let mut app = test_app();
        update(&mut app, Action::LoadTools);
        assert!(app.loading_tools());
        update(&mut app, Action::ToolsLoaded(Ok(vec![tool(1, "calc")])));
        assert!(!app.loading_tools());

        let data = ToolCreate {
            name: "search".into(),
            ..Default::default()
        };
        assert_eq!(
            update(&mut app, Action::CreateTool(data.clone())),
            Effect::CreateTool(data)
        );
        update(&mut app, Action::ToolCreated(Ok(tool(2, "search"))));
        assert_eq!(app.tools.len(), 2);

        update(
            &mut app,
            Action::UpdateTool {
                id: 1,
                update: ToolUpdate {
                    name: Some("calculator".into()),
                    description: None,
                },
            },
        );
        update(
            &mut app,
            Action::ToolUpdated {
                id: 1,
                result: Ok(tool(1, "calculator")),
            },
        );
        assert_eq!(app.tools[0].name, "calculator");

        update(&mut app, Action::DeleteTool(2));
        update(&mut app, Action::ToolDeleted { id: 2, result: Ok(()) });
        assert_eq!(app.tools.len(), 1);
        assert!(!app.loading_tools());
    }

    #[test]
    fn test_tool_failure_clears_loading_and_sets_error() {
        let mut app = test_app();
        update(&mut app, Action::DeleteTool(5));
        update(
            &mut app,
            Action::ToolDeleted {
                id: 5,
                result: Err(api_err("in use")),
            },
        );
        assert!(!app.loading_tools());
        assert_eq!(
            app.error.as_deref(),
            Some("Failed to delete tool: HTTP 500: in use")
        );
    }

    #[test]
    fn test_loading_flag_tracks_overlapping_operations() {
        let mut app = test_app();
        update(&mut app, Action::LoadTools);
        update(&mut app, Action::DeleteTool(1));
        update(&mut app, Action::ToolsLoaded(Ok(vec![])));
        assert!(app.loading_tools());
        update(&mut app, Action::ToolDeleted { id: 1, result: Ok(()) });
        assert!(!app.loading_tools());
    }

    #[test]
    fn test_nameless_tool_and_empty_update_are_ignored() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::CreateTool(ToolCreate::default())),
            Effect::None
        );
        assert_eq!(
            update(
                &mut app,
                Action::UpdateTool {
                    id: 1,
                    update: ToolUpdate::default()
                }
            ),
            Effect::None
        );
        assert!(!app.loading_tools());
    }

    #[test]
    fn test_assign_tool_updates_directory_tab_and_active_tool() {
        let mut app = app_with_directory(&[3]);
        open(&mut app, Chat::new(3));
        let effect = update(&mut app, Action::AssignTool { chat_id: 3, tool_id: 7 });
        assert_eq!(effect, Effect::AssignTool { chat_id: 3, tool_id: 7 });

        let server = Chat {
            active_tool_id: Some(7),
            ..Chat::new(3)
        };
        update(
            &mut app,
            Action::ToolAssigned {
                chat_id: 3,
                tool_id: 7,
                result: Ok(server),
            },
        );
        assert_eq!(app.chats[0].active_tool_id, Some(7));
        assert_eq!(app.open_chats[&3].chat.active_tool_id, Some(7));
        assert_eq!(app.active_tool, Some(7));
    }

    #[test]
    fn test_active_tool_follows_active_tab() {
        let mut app = test_app();
        open(
            &mut app,
            Chat {
                active_tool_id: Some(4),
                ..Chat::new(1)
            },
        );
        assert_eq!(app.active_tool, Some(4));
        open(&mut app, Chat::new(2));
        assert_eq!(app.active_tool, None);
        update(&mut app, Action::SelectTab(1));
        assert_eq!(app.active_tool, Some(4));
    }

    #[test]
    fn test_assign_failure_keeps_chat() {
        let mut app = app_with_directory(&[3]);
        open(&mut app, Chat::new(3));
        update(
            &mut app,
            Action::ToolAssigned {
                chat_id: 3,
                tool_id: 7,
                result: Err(api_err("no such tool")),
            },
        );
        assert_eq!(app.open_chats[&3].chat.active_tool_id, None);
        assert_eq!(app.active_tool, None);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
