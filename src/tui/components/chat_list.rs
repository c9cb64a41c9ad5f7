//! # Chat Directory Component
//!
//! Overlay listing every chat the server knows about. Opened with Ctrl+O,
//! dismissed with Esc. Chats already open in a tab are marked with `●`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ChatListState` lives in `TuiState` (selection and delete confirmation)
//! - `ChatList` is created each frame with the directory borrowed from `App`
//!
//! The directory itself is not copied into the overlay; results of
//! delete/reload land in `App::chats` and show up on the next frame.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::api::{Chat, ChatId};
use crate::core::tabs::derive_title;
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

/// Persistent state for the directory overlay.
#[derive(Default)]
pub struct ChatListState {
    pub selected: usize,
    /// Chat armed by a first `d`; only that chat can be deleted by the second
    pub confirm_delete: Option<ChatId>,
    pub list_state: ListState,
}

/// Events emitted by the directory overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatListEvent {
    Open(ChatId),
    CreateNew,
    Delete(ChatId),
    Reload,
    Dismiss,
}

impl ChatListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection inside a directory of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    /// Handle a key event against the current directory.
    pub fn handle_event(&mut self, event: &TuiEvent, chats: &[Chat]) -> Option<ChatListEvent> {
        // Reset delete confirmation on any non-delete key
        if !matches!(event, TuiEvent::InputChar('d')) {
            self.confirm_delete = None;
        }
        self.clamp(chats.len());

        match event {
            TuiEvent::Escape => Some(ChatListEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.clamp(chats.len());
                None
            }
            TuiEvent::CursorDown => {
                self.selected += 1;
                self.clamp(chats.len());
                None
            }
            TuiEvent::Submit => chats
                .get(self.selected)
                .map(|chat| ChatListEvent::Open(chat.id)),
            TuiEvent::InputChar('n') => Some(ChatListEvent::CreateNew),
            TuiEvent::InputChar('r') => Some(ChatListEvent::Reload),
            TuiEvent::InputChar('d') => {
                let Some(chat) = chats.get(self.selected) else {
                    self.confirm_delete = None;
                    return None;
                };
                if self.confirm_delete == Some(chat.id) {
                    self.confirm_delete = None;
                    Some(ChatListEvent::Delete(chat.id))
                } else {
                    self.confirm_delete = Some(chat.id);
                    None
                }
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the directory overlay.
pub struct ChatList<'a> {
    state: &'a mut ChatListState,
    chats: &'a [Chat],
    open_tabs: &'a [ChatId],
}

impl<'a> ChatList<'a> {
    pub fn new(state: &'a mut ChatListState, chats: &'a [Chat], open_tabs: &'a [ChatId]) -> Self {
        Self {
            state,
            chats,
            open_tabs,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 70, area);
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.confirm_delete.is_some() {
            " Press d again to confirm delete | Esc Cancel "
        } else {
            " Enter Open  n New  d Delete  r Reload  Esc Back "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Chats ({}) ", self.chats.len()))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.chats.is_empty() {
            let empty = Paragraph::new("No chats yet. Press n to start one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        self.state.clamp(self.chats.len());
        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding

        let items: Vec<ListItem> = self
            .chats
            .iter()
            .enumerate()
            .map(|(i, chat)| {
                let marker = if self.open_tabs.contains(&chat.id) { "● " } else { "  " };
                let date = format_date(chat.created_at);
                let count = format!("{} msgs", chat.history.len());

                // Layout: "● Jan 15  <title>   12 msgs"
                let fixed_width = marker.chars().count() + date.len() + 2 + count.len() + 2;
                let title_width = inner_width.saturating_sub(fixed_width);
                // Leave room for the "..." a truncated title gains
                let title = derive_title(chat, title_width.saturating_sub(3));
                let padded_title = format!("{:<width$}", title, width = title_width);

                let style = if i == self.state.selected {
                    let fg = if self.state.confirm_delete.is_some() {
                        Color::Red
                    } else {
                        Color::White
                    };
                    Style::default()
                        .fg(fg)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(marker, style.fg(Color::Cyan)),
                    Span::styled(date, style),
                    Span::styled("  ", style),
                    Span::styled(padded_title, style),
                    Span::styled("  ", style),
                    Span::styled(count, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// "Jan 15" in local time, or blanks when the server sent no timestamp.
fn format_date(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts.with_timezone(&Local).format("%b %d").to_string(),
        None => " ".repeat(6),
    }
}
