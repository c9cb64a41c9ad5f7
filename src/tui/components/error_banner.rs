//! Global error banner, shown under the tab strip until dismissed with Esc.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

pub struct ErrorBanner<'a> {
    pub message: &'a str,
}

impl<'a> ErrorBanner<'a> {
    /// One line of text between two borders.
    pub const HEIGHT: u16 = 3;

    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Component for ErrorBanner<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().fg(Color::Red);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style)
            .title(Line::styled(" Error ", style.add_modifier(Modifier::BOLD)))
            .title_bottom(Line::from(" Esc dismiss ").right_aligned());

        // Only the first line fits; the full text is in the log
        let first_line = self.message.lines().next().unwrap_or_default();
        let paragraph = Paragraph::new(first_line).style(style).block(block);
        frame.render_widget(paragraph, area);
    }
}
