//! # Tab Order
//!
//! Pure helpers for the tab strip. Tab order is derived, never edited ad hoc:
//! after the open set changes, [`reconcile_tab_order`] keeps the surviving
//! entries where they were and appends newcomers in the order they were opened.

use std::collections::HashSet;

use crate::api::{Chat, ChatId};

/// Default maximum tab label length, in characters.
pub const DEFAULT_TITLE_LENGTH: usize = 30;

/// Recompute tab order from the previous order and the currently open tabs.
///
/// `open` pairs each open chat id with its open sequence number. Ids in
/// `previous` that are no longer open are dropped; open ids missing from
/// `previous` are appended sorted by sequence.
pub fn reconcile_tab_order(previous: &[ChatId], open: &[(ChatId, u64)]) -> Vec<ChatId> {
    let open_ids: HashSet<ChatId> = open.iter().map(|(id, _)| *id).collect();

    let mut seen = HashSet::new();
    let mut order: Vec<ChatId> = previous
        .iter()
        .copied()
        .filter(|id| open_ids.contains(id) && seen.insert(*id))
        .collect();

    let mut newcomers: Vec<(ChatId, u64)> = open
        .iter()
        .copied()
        .filter(|(id, _)| !seen.contains(id))
        .collect();
    newcomers.sort_by_key(|(id, seq)| (*seq, *id));
    order.extend(newcomers.into_iter().map(|(id, _)| id));
    order
}

/// Move the entry at `from` to `to`. Returns false (and leaves `order` alone)
/// if either index is out of range or they are equal.
pub fn move_tab(order: &mut Vec<ChatId>, from: usize, to: usize) -> bool {
    if from == to || from >= order.len() || to >= order.len() {
        return false;
    }
    let moved = order.remove(from);
    order.insert(to, moved);
    true
}

/// Which tab becomes active after `closed_index` is removed from an order that
/// now has `remaining` entries: the one that slid into its place, else the new last one.
pub fn fallback_index(closed_index: usize, remaining: usize) -> Option<usize> {
    if remaining == 0 {
        None
    } else {
        Some(closed_index.min(remaining - 1))
    }
}

/// Tab label: the first user message on one line, truncated to `max_chars`,
/// or `Chat {id}`.
pub fn derive_title(chat: &Chat, max_chars: usize) -> String {
    let Some(first) = chat.first_user_message() else {
        return format!("Chat {}", chat.id);
    };
    let content = first.content.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.is_empty() {
        return format!("Chat {}", chat.id);
    }
    if content.chars().count() > max_chars {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated.trim_end())
    } else {
        content
    }
}
