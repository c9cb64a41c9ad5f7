use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::{ChatMessage, Role};
use crate::core::content::{MessageBody, ThoughtStep};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// What a single bubble in the conversation shows.
#[derive(Debug, Clone, Copy)]
pub enum MessageView<'a> {
    /// A message from the chat's history, with its resolved body.
    Stored {
        message: &'a ChatMessage,
        body: &'a MessageBody,
    },
    /// The user's in-flight message. Not part of history yet.
    Pending(&'a str),
    /// Why the last send failed.
    Failed(&'a str),
}

/// A stateless component that renders one conversation bubble.
///
/// Like the rest of the conversation view it is transient: built each frame
/// from borrowed chat state. [`calculate_height`](Self::calculate_height)
/// lets the parent lay out a scroll canvas before rendering anything.
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    pub view: MessageView<'a>,
    pub spinner_frame: usize,
}

impl<'a> Message<'a> {
    pub fn new(view: MessageView<'a>, spinner_frame: usize) -> Self {
        Self {
            view,
            spinner_frame,
        }
    }

    pub fn title(&self) -> String {
        match self.view {
            MessageView::Stored { message, .. } => match message.role {
                Role::User => "you".to_string(),
                Role::Assistant => "assistant".to_string(),
                Role::System => "system".to_string(),
            },
            MessageView::Pending(_) => {
                let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
                format!("you {glyph} sending…")
            }
            MessageView::Failed(_) => "not sent".to_string(),
        }
    }

    pub fn style(&self) -> Style {
        match self.view {
            MessageView::Stored { message, .. } => match message.role {
                Role::User => Style::default().fg(Color::Green),
                Role::Assistant => Style::default().fg(Color::Blue),
                Role::System => Style::default().fg(Color::Yellow),
            },
            MessageView::Pending(_) => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            MessageView::Failed(_) => Style::default().fg(Color::Red),
        }
    }

    /// Text lines of the bubble, before wrapping.
    pub fn lines(&self) -> Vec<Line<'a>> {
        match self.view {
            MessageView::Stored { body, .. } => body_lines(body),
            MessageView::Pending(text) | MessageView::Failed(text) => plain_lines(text),
        }
    }

    fn paragraph(&self) -> Paragraph<'a> {
        Paragraph::new(self.lines())
            .style(self.style())
            .wrap(Wrap { trim: false })
    }

    /// Height this bubble needs at `width`, borders included.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row.
            return 1;
        }
        let lines = self.paragraph().line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

fn plain_lines(text: &str) -> Vec<Line<'_>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return vec![Line::default()];
    }
    trimmed.lines().map(Line::raw).collect()
}

/// Numbered reasoning steps followed by a "Final Answer" section.
fn body_lines(body: &MessageBody) -> Vec<Line<'_>> {
    match body {
        MessageBody::PlainText(text) => plain_lines(text),
        MessageBody::Structured {
            steps,
            final_answer,
        } => {
            let mut lines: Vec<Line> = steps.iter().flat_map(step_lines).collect();
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::styled(
                "Final Answer",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
            lines.extend(plain_lines(final_answer));
            lines
        }
    }
}

fn step_lines(step: &ThoughtStep) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{}. ", step.step),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(step.thought.as_str()),
    ])];
    let reasoning_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);
    lines.extend(
        step.reasoning
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| Line::from(vec![Span::raw("   "), Span::styled(l, reasoning_style)])),
    );
    lines
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.style();
        let border_style = match self.view {
            MessageView::Failed(_) => style,
            _ => style.add_modifier(Modifier::DIM),
        };

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
