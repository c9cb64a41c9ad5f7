//! # StatusBar Component
//!
//! Bottom line showing where we are connected, the active tab's tool, and
//! the key hints.
//!
//! ## Design Decisions
//!
//! Stateless, props-in-struct like the other presentational components.
//! The hints are right-aligned and drawn first, so on a narrow terminal the
//! left-hand status text wins.
//!
//! ## Conditional Formatting
//!
//! 1. **Tools syncing**: `"tabchat | http://localhost:8000 | tool: search | tools syncing…"`
//! 2. **Grid view**: `"tabchat | http://localhost:8000 | grid"`
//! 3. **Default**: `"tabchat | http://localhost:8000"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::tui::component::Component;

const KEY_HINTS: &str = "^O chats  ^T tools  ^N new  ^W close  ^G grid  ^C quit ";

pub struct StatusBar<'a> {
    /// API base URL the client talks to
    pub api_url: &'a str,
    /// Name of the tool assigned to the active tab
    pub active_tool: Option<&'a str>,
    /// Whether any tool operation is in flight
    pub tools_busy: bool,
    pub grid_view: bool,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        api_url: &'a str,
        active_tool: Option<&'a str>,
        tools_busy: bool,
        grid_view: bool,
    ) -> Self {
        Self {
            api_url,
            active_tool,
            tools_busy,
            grid_view,
        }
    }

    pub fn status_text(&self) -> String {
        let mut parts = vec!["tabchat".to_string(), self.api_url.to_string()];
        if let Some(tool) = self.active_tool {
            parts.push(format!("tool: {tool}"));
        }
        if self.grid_view {
            parts.push("grid".to_string());
        }
        if self.tools_busy {
            parts.push("tools syncing…".to_string());
        }
        format!(" {}", parts.join(" | "))
    }
}

impl<'a> Component for StatusBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        frame.render_widget(Line::styled(KEY_HINTS, dim).right_aligned(), area);
        frame.render_widget(Line::raw(self.status_text()), area);
    }
}
