//! # Effect Execution
//!
//! Turns an [`Effect`] into backend calls and packages the outcome as the
//! follow-up [`Action`]. Every call path produces an action, success or
//! failure, so pending state set by `update()` is always resolved.
//!
//! This is the only place core reaches the network, and it does so through
//! the `ChatApi` trait object, never through a concrete client.

use futures::future::join_all;
use log::{info, warn};

use crate::api::ChatApi;
use crate::core::action::{Action, Effect};

/// Runs one effect. Returns `None` for effects that need no backend call
/// (`None`, `Quit`).
pub async fn perform(effect: Effect, api: &dyn ChatApi) -> Option<Action> {
    let action = match effect {
        Effect::None | Effect::Quit => return None,
        Effect::FetchChats => Action::ChatsLoaded(api.list_chats().await),
        Effect::RefreshChats(tabs) => {
            info!("Refreshing {} open chats", tabs.len());
            let results = join_all(tabs.iter().map(|(id, _)| api.get_chat(*id))).await;
            let chats = tabs
                .iter()
                .zip(results)
                .filter_map(|((id, revision), result)| match result {
                    Ok(chat) => Some((*revision, chat)),
                    Err(e) => {
                        warn!("Failed to refresh chat {}: {}", id, e);
                        None
                    }
                })
                .collect();
            Action::OpenChatsRefreshed(chats)
        }
        Effect::FetchChat(id) => Action::ChatOpened(api.get_chat(id).await),
        Effect::CreateChat => Action::ChatCreated(api.create_chat().await),
        Effect::DeleteChat(id) => Action::ChatDeleted {
            id,
            result: api.delete_chat(id).await,
        },
        Effect::ClearHistory(id) => Action::HistoryCleared {
            id,
            result: api.clear_history(id).await,
        },
        Effect::SendMessage { chat_id, content } => Action::MessageSent {
            chat_id,
            result: api.send_message(chat_id, &content).await,
        },
        Effect::FetchTools => Action::ToolsLoaded(api.list_tools().await),
        Effect::CreateTool(data) => Action::ToolCreated(api.create_tool(&data).await),
        Effect::UpdateTool { id, update } => Action::ToolUpdated {
            id,
            result: api.update_tool(id, &update).await,
        },
        Effect::DeleteTool(id) => Action::ToolDeleted {
            id,
            result: api.delete_tool(id).await,
        },
        Effect::AssignTool { chat_id, tool_id } => Action::ToolAssigned {
            chat_id,
            tool_id,
            result: api.assign_tool_to_chat(chat_id, tool_id).await,
        },
    };
    Some(action)
}
