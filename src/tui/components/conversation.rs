//! # Conversation Component
//!
//! Scrollable view of one open chat: its history, the pending message while
//! a send is in flight, and the inline error after a failed send.
//!
//! `Conversation` is a transient component (created each frame) that wraps
//! `&'a mut ConversationState` (persistent, one per tab) and a `&ChatState`
//! (props). Scroll position survives tab switches because the TUI keeps one
//! `ConversationState` per chat id.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::ChatState;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, MessageView};
use crate::tui::event::TuiEvent;

/// Scroll state for one tab's conversation.
pub struct ConversationState {
    pub scroll_state: ScrollViewState,
    /// When true, follow new content at the bottom
    pub stick_to_bottom: bool,
    /// Last rendered canvas height (for clamping between frames)
    pub content_height: u16,
    /// Last known viewport height
    pub viewport_height: u16,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Keep the offset inside the canvas, or pin it to the bottom.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if self.stick_to_bottom || current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
            self.clamp_scroll();
        }
    }
}

impl EventHandler for ConversationState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Scrollable conversation view for one tab.
pub struct Conversation<'a> {
    pub state: &'a mut ConversationState,
    pub chat: &'a ChatState,
    pub spinner_frame: usize,
}

impl<'a> Conversation<'a> {
    pub fn new(state: &'a mut ConversationState, chat: &'a ChatState, spinner_frame: usize) -> Self {
        Self {
            state,
            chat,
            spinner_frame,
        }
    }

    /// Everything shown for this tab, top to bottom.
    fn messages(&self) -> Vec<Message<'a>> {
        let chat: &'a ChatState = self.chat;
        let mut views: Vec<MessageView<'a>> = chat
            .messages
            .iter()
            .zip(&chat.bodies)
            .map(|(message, body)| MessageView::Stored { message, body })
            .collect();
        if let Some(preview) = chat.preview_message() {
            views.push(MessageView::Pending(preview));
        }
        if let Some(error) = chat.error() {
            views.push(MessageView::Failed(error));
        }
        views
            .into_iter()
            .map(|view| Message::new(view, self.spinner_frame))
            .collect()
    }
}

impl<'a> Component for Conversation<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let messages = self.messages();
        if messages.is_empty() {
            let hint = Paragraph::new("No messages yet. Type below and press Enter.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(hint, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let heights: Vec<u16> = messages
            .iter()
            .map(|m| m.calculate_height(content_width))
            .collect();
        let total_height = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (message, height) in messages.into_iter().zip(heights) {
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(message, rect);
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
