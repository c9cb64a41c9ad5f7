//! # TabBar Component
//!
//! One-line strip of open tabs, in tab order. The active tab is reversed,
//! tabs waiting on a reply carry a spinner.
//!
//! Stateless: receives the labels from `App::tab_labels()` as props. When
//! the labels don't fit, a window around the active tab is shown with
//! `‹`/`›` markers for what was cut off.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::state::TabLabel;
use crate::tui::component::Component;

const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
const SEPARATOR: &str = "│";

pub struct TabBar<'a> {
    pub tabs: &'a [TabLabel],
    pub spinner_frame: usize,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [TabLabel], spinner_frame: usize) -> Self {
        Self {
            tabs,
            spinner_frame,
        }
    }

    fn label(&self, tab: &TabLabel) -> String {
        if tab.is_loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            format!(" {glyph} {} ", tab.title)
        } else {
            format!(" {} ", tab.title)
        }
    }
}

/// Pick the run of tabs to show within `available` columns.
///
/// Each tab costs its width plus one separator column. Starts from the
/// active tab, grows to the right, then to the left.
pub fn visible_window(widths: &[usize], active: Option<usize>, available: usize) -> Range<usize> {
    let cost = |i: usize| widths[i] + 1;
    let total: usize = (0..widths.len()).map(cost).sum();
    if total <= available {
        return 0..widths.len();
    }

    // Reserve room for the overflow markers
    let budget = available.saturating_sub(2);
    let start = active.unwrap_or(0).min(widths.len().saturating_sub(1));
    let mut end = start;
    let mut used = 0;
    while end < widths.len() && used + cost(end) <= budget {
        used += cost(end);
        end += 1;
    }
    let mut begin = start;
    while begin > 0 && used + cost(begin - 1) <= budget {
        begin -= 1;
        used += cost(begin);
    }
    // Always show the active tab, even if it alone is too wide
    begin..end.max(start + 1).min(widths.len())
}

impl<'a> Component for TabBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.tabs.is_empty() {
            let hint = Line::styled(
                " No open chats. Ctrl+O to browse, Ctrl+N for a new one",
                Style::default().fg(Color::DarkGray),
            );
            frame.render_widget(hint, area);
            return;
        }

        let labels: Vec<String> = self.tabs.iter().map(|t| self.label(t)).collect();
        let widths: Vec<usize> = labels.iter().map(|l| l.width()).collect();
        let active = self.tabs.iter().position(|t| t.is_active);
        let window = visible_window(&widths, active, area.width as usize);

        let marker = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        if window.start > 0 {
            spans.push(Span::styled("‹", marker));
        }
        for i in window.clone() {
            let style = if self.tabs[i].is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(labels[i].clone(), style));
            spans.push(Span::styled(SEPARATOR, marker));
        }
        if window.end < self.tabs.len() {
            spans.push(Span::styled("›", marker));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn label(id: u64, title: &str, is_active: bool, is_loading: bool) -> TabLabel {
        TabLabel {
            id,
            title: title.to_string(),
            is_active,
            is_loading,
        }
    }

    fn render(tabs: &[TabLabel], width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                TabBar::new(tabs, 0).render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_window_fits_everything() {
        assert_eq!(visible_window(&[5, 5, 5], Some(1), 80), 0..3);
        assert_eq!(visible_window(&[], None, 80), 0..0);
    }

    #[test]
    fn test_window_keeps_active_visible() {
        // Each tab costs 10; 22 columns leave room for two after markers
        let widths = [9, 9, 9, 9, 9];
        assert_eq!(visible_window(&widths, Some(4), 22), 3..5);
        assert_eq!(visible_window(&widths, Some(0), 22), 0..2);
        assert_eq!(visible_window(&widths, Some(2), 22), 2..4);
    }

    #[test]
    fn test_window_oversized_active_tab() {
        assert_eq!(visible_window(&[50, 3], Some(0), 10), 0..1);
    }

    #[test]
    fn test_renders_titles_in_order() {
        let tabs = vec![
            label(1, "Alpha", false, false),
            label(2, "Beta", true, false),
        ];
        let text = render(&tabs, 40);
        let alpha = text.find("Alpha").unwrap();
        let beta = text.find("Beta").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn test_loading_tab_has_spinner() {
        let tabs = vec![label(1, "Busy", true, true)];
        let text = render(&tabs, 40);
        assert!(text.contains(SPINNER[0]));
        assert!(text.contains("Busy"));
    }

    #[test]
    fn test_overflow_shows_markers() {
        let tabs: Vec<TabLabel> = (1..=6)
            .map(|i| label(i, &format!("Chat number {i}"), i == 6, false))
            .collect();
        let text = render(&tabs, 30);
        assert!(text.starts_with('‹'));
        assert!(text.contains("Chat number 6"));
        assert!(!text.contains("Chat number 1 "));
    }

    #[test]
    fn test_empty_hint() {
        let text = render(&[], 80);
        assert!(text.contains("No open chats"));
    }
}
