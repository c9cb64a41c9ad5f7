//! # InputBox Component
//!
//! Message composer under the conversation.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and basic cursor movement
//! - Emit `Submit` on Enter unless sending is blocked
//! - Collapse to a single line on Ctrl+E and expand again on demand
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `blocked` is a prop set by the
//! event loop each frame: `Some(reason)` while the active tab has no place to
//! send to (no tab, or a reply is pending). Typing still works while blocked;
//! only submission is refused, so a draft survives the wait.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
    /// Collapsed state flipped
    Toggled,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Why submission is refused right now (Prop)
    pub blocked: Option<&'static str>,
    /// Showing a single line only
    pub collapsed: bool,
    /// Cursor position as byte offset in buffer
    cursor: usize,
    /// First visible wrapped line
    scroll_offset: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            blocked: None,
            collapsed: false,
            cursor: 0,
            scroll_offset: 0,
        }
    }

    /// Height for the current buffer, clamped to the visible line limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        if self.collapsed {
            return 1 + VERTICAL_OVERHEAD;
        }
        let lines = wrap_line_count(&self.buffer, inner_width(area_width));
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        // Typing into a collapsed box brings it back
        self.collapsed = false;
    }

    /// Wrapped line and display column of the cursor.
    fn cursor_line_col(&self, width: u16) -> (u16, u16) {
        let before = &self.buffer[..self.cursor];
        let line = wrap_line_count(before, width).saturating_sub(1);

        let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let wrapped = textwrap::wrap(logical, wrap_options(width));
        // textwrap trims the whitespace it breaks on, so count from the raw text
        let col = if wrapped.len() > 1 {
            let consumed: usize = wrapped[..wrapped.len() - 1]
                .iter()
                .map(|seg| seg.chars().count())
                .sum();
            logical.chars().count().saturating_sub(consumed)
        } else {
            logical.width()
        };
        (line, col.min(width.saturating_sub(1) as usize) as u16)
    }

    fn visible_lines(&mut self, width: u16) -> Vec<String> {
        let lines: Vec<String> = if width == 0 || self.buffer.is_empty() {
            vec![String::new()]
        } else {
            let mut lines: Vec<String> = textwrap::wrap(&self.buffer, wrap_options(width))
                .into_iter()
                .map(|l| l.into_owned())
                .collect();
            if self.buffer.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
                lines.push(String::new());
            }
            lines
        };

        if self.collapsed {
            let first = lines.first().cloned().unwrap_or_default();
            let more = lines.len() > 1;
            self.scroll_offset = 0;
            return vec![if more { format!("{first} …") } else { first }];
        }

        // Keep the cursor line inside the viewport
        let (cursor_line, _) = self.cursor_line_col(width);
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_line + 1 - MAX_VISIBLE_LINES;
        }
        lines
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .collect()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let visible = self.visible_lines(width);

        let (title, border_style) = match self.blocked {
            Some(reason) => (
                format!(" {reason} "),
                Style::default().fg(Color::DarkGray),
            ),
            None => (" Message ".to_string(), Style::default().fg(Color::Green)),
        };
        let hint = if self.collapsed {
            " Ctrl+E expand "
        } else {
            " Enter send  Ctrl+J newline  Ctrl+E collapse "
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(hint).right_aligned())
            .padding(ratatui::widgets::Padding::horizontal(1));

        let text_style = if self.blocked.is_some() {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        let lines: Vec<Line> = visible.into_iter().map(Line::raw).collect();
        frame.render_widget(Paragraph::new(lines).style(text_style).block(block), area);

        if !self.collapsed && width > 0 {
            let (line, col) = self.cursor_line_col(width);
            let row = line.saturating_sub(self.scroll_offset);
            frame.set_cursor_position((area.x + CONTENT_OFFSET + col, area.y + 1 + row));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.blocked.is_some() || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_offset = 0;
                Some(InputEvent::Submit(text))
            }
            TuiEvent::ToggleInput => {
                self.collapsed = !self.collapsed;
                Some(InputEvent::Toggled)
            }
            _ => None,
        }
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Count wrapped lines, including the empty line after a trailing newline.
fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
