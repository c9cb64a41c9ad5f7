//! # Grid View
//!
//! Every open tab tiled at once, in tab order, left to right and top to
//! bottom. The active tab's border is highlighted. Each tile is a regular
//! [`Conversation`] sharing the per-tab scroll state with the tabbed view.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType};

use crate::api::ChatId;
use crate::core::state::App;
use crate::core::tabs::derive_title;
use crate::tui::component::Component;
use crate::tui::components::conversation::{Conversation, ConversationState};

/// Columns and rows for `n` tiles: as square as possible, wider than tall.
pub fn grid_dims(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    let rows = n.div_ceil(cols);
    (cols, rows)
}

pub struct TabGrid<'a> {
    pub app: &'a App,
    pub conversations: &'a mut HashMap<ChatId, ConversationState>,
    pub spinner_frame: usize,
}

impl<'a> TabGrid<'a> {
    pub fn new(
        app: &'a App,
        conversations: &'a mut HashMap<ChatId, ConversationState>,
        spinner_frame: usize,
    ) -> Self {
        Self {
            app,
            conversations,
            spinner_frame,
        }
    }
}

impl<'a> Component for TabGrid<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let tabs: Vec<_> = self.app.ordered_tabs().collect();
        let (cols, rows) = grid_dims(tabs.len());
        if cols == 0 {
            return;
        }

        let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);
        let cells = row_areas.iter().flat_map(|row| {
            Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row)
                .to_vec()
        });

        for (chat, cell) in tabs.into_iter().zip(cells) {
            let id = chat.chat.id;
            let is_active = self.app.active_tab == Some(id);
            let border_style = if is_active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let title = derive_title(&chat.chat, self.app.title_length);
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(format!(" {title} "));
            let inner = block.inner(cell);
            frame.render_widget(block, cell);

            let state = self.conversations.entry(id).or_default();
            Conversation::new(state, chat, self.spinner_frame).render(frame, inner);
        }
    }
}
