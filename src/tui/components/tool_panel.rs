//! # Tool Panel Component
//!
//! Overlay for the tool registry. Opened with Ctrl+T, dismissed with Esc.
//!
//! - Enter assigns the selected tool to the active tab's chat
//! - `n` / `e` open a small form to create or edit a tool
//! - `d` twice deletes, `r` refreshes the list from the server
//!
//! Same state/wrapper split as the chat directory: `ToolPanelState` is
//! persistent, the tool list itself is borrowed from `App` each frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::api::{Tool, ToolCreate, ToolId, ToolUpdate};
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Description,
}

/// Create/edit form. `editing` is the tool being edited, `None` for a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolForm {
    pub editing: Option<ToolId>,
    pub name: String,
    pub description: String,
    pub field: FormField,
    original: Option<(String, String)>,
}

impl ToolForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(tool: &Tool) -> Self {
        Self {
            editing: Some(tool.id),
            name: tool.name.clone(),
            description: tool.description.clone(),
            field: FormField::Name,
            original: Some((tool.name.clone(), tool.description.clone())),
        }
    }

    fn active_text(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
        }
    }

    /// Only the fields that differ from the tool being edited.
    fn changes(&self) -> ToolUpdate {
        let (name, description) = self.original.clone().unwrap_or_default();
        let name_now = self.name.trim();
        let description_now = self.description.trim();
        ToolUpdate {
            name: (name_now != name).then(|| name_now.to_string()),
            description: (description_now != description).then(|| description_now.to_string()),
        }
    }

    fn submit(&self) -> Option<ToolPanelEvent> {
        if self.name.trim().is_empty() {
            return None;
        }
        match self.editing {
            Some(id) => {
                let update = self.changes();
                if update.is_empty() {
                    return None;
                }
                Some(ToolPanelEvent::Update(id, update))
            }
            None => Some(ToolPanelEvent::Create(ToolCreate {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                ..Default::default()
            })),
        }
    }
}

/// Events emitted by the tool panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPanelEvent {
    Assign(ToolId),
    Create(ToolCreate),
    Update(ToolId, ToolUpdate),
    Delete(ToolId),
    Refresh,
    Dismiss,
}

/// Persistent state for the tool panel overlay.
#[derive(Default)]
pub struct ToolPanelState {
    pub selected: usize,
    /// Tool armed by a first `d`
    pub confirm_delete: Option<ToolId>,
    pub list_state: ListState,
    pub form: Option<ToolForm>,
}

impl ToolPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    /// Handle a key event. `can_assign` is false when no tab is active.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        tools: &[Tool],
        can_assign: bool,
    ) -> Option<ToolPanelEvent> {
        if self.form.is_some() {
            return self.handle_form_event(event);
        }

        if !matches!(event, TuiEvent::InputChar('d')) {
            self.confirm_delete = None;
        }
        self.clamp(tools.len());

        match event {
            TuiEvent::Escape => Some(ToolPanelEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.clamp(tools.len());
                None
            }
            TuiEvent::CursorDown => {
                self.selected += 1;
                self.clamp(tools.len());
                None
            }
            TuiEvent::Submit if can_assign => tools
                .get(self.selected)
                .map(|tool| ToolPanelEvent::Assign(tool.id)),
            TuiEvent::InputChar('n') => {
                self.form = Some(ToolForm::create());
                None
            }
            TuiEvent::InputChar('e') => {
                self.form = tools.get(self.selected).map(ToolForm::edit);
                None
            }
            TuiEvent::InputChar('r') => Some(ToolPanelEvent::Refresh),
            TuiEvent::InputChar('d') => {
                let Some(tool) = tools.get(self.selected) else {
                    self.confirm_delete = None;
                    return None;
                };
                if self.confirm_delete == Some(tool.id) {
                    self.confirm_delete = None;
                    Some(ToolPanelEvent::Delete(tool.id))
                } else {
                    self.confirm_delete = Some(tool.id);
                    None
                }
            }
            _ => None,
        }
    }

    fn handle_form_event(&mut self, event: &TuiEvent) -> Option<ToolPanelEvent> {
        let form = self.form.as_mut()?;
        match event {
            TuiEvent::Escape => self.form = None,
            TuiEvent::NextField => {
                form.field = match form.field {
                    FormField::Name => FormField::Description,
                    FormField::Description => FormField::Name,
                };
            }
            // Single-line fields: newlines from Ctrl+J are dropped
            TuiEvent::InputChar('\n') => {}
            TuiEvent::InputChar(c) => form.active_text().push(*c),
            TuiEvent::Paste(text) => form
                .active_text()
                .extend(text.chars().filter(|c| *c != '\n' && *c != '\r')),
            TuiEvent::Backspace => {
                form.active_text().pop();
            }
            TuiEvent::Submit => {
                let event = form.submit();
                if event.is_some() {
                    self.form = None;
                }
                return event;
            }
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the tool panel.
pub struct ToolPanel<'a> {
    state: &'a mut ToolPanelState,
    tools: &'a [Tool],
    active_tool: Option<ToolId>,
    loading: bool,
    can_assign: bool,
}

impl<'a> ToolPanel<'a> {
    pub fn new(
        state: &'a mut ToolPanelState,
        tools: &'a [Tool],
        active_tool: Option<ToolId>,
        loading: bool,
        can_assign: bool,
    ) -> Self {
        Self {
            state,
            tools,
            active_tool,
            loading,
            can_assign,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.confirm_delete.is_some() {
            " Press d again to confirm delete | Esc Cancel "
        } else if self.can_assign {
            " Enter Assign  n New  e Edit  d Delete  r Refresh  Esc Back "
        } else {
            " n New  e Edit  d Delete  r Refresh  Esc Back "
        };
        let title = if self.loading {
            " Tools (syncing…) ".to_string()
        } else {
            format!(" Tools ({}) ", self.tools.len())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.tools.is_empty() {
            let empty = Paragraph::new("No tools registered. Press n to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
        } else {
            self.state.clamp(self.tools.len());
            let items: Vec<ListItem> = self
                .tools
                .iter()
                .enumerate()
                .map(|(i, tool)| self.tool_item(i, tool))
                .collect();
            let list = List::new(items).block(block);
            frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
        }

        if let Some(form) = &self.state.form {
            render_form(frame, overlay, form);
        }
    }

    fn tool_item(&self, index: usize, tool: &'a Tool) -> ListItem<'a> {
        let is_active = self.active_tool == Some(tool.id);
        let marker = if is_active { "● " } else { "  " };
        let style = if index == self.state.selected {
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
        let mut spans = vec![
            Span::styled(marker, style.fg(Color::Cyan)),
            Span::styled(tool.name.as_str(), style),
        ];
        if !tool.description.is_empty() {
            spans.push(Span::styled("  ", style));
            spans.push(Span::styled(
                tool.description.as_str(),
                style.add_modifier(Modifier::DIM),
            ));
        }
        ListItem::new(Line::from(spans))
    }
}

fn render_form(frame: &mut Frame, outer: Rect, form: &ToolForm) {
    let area = centered_rect(80, 50, outer);
    frame.render_widget(Clear, area);

    let title = if form.editing.is_some() {
        " Edit tool "
    } else {
        " New tool "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_bottom(Line::from(" Tab Switch field  Enter Save  Esc Cancel ").centered())
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_area, description_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    for (field, label, value, field_area) in [
        (FormField::Name, "Name: ", &form.name, name_area),
        (
            FormField::Description,
            "Description: ",
            &form.description,
            description_area,
        ),
    ] {
        let focused = form.field == field;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(value.as_str()),
        ]);
        frame.render_widget(line, field_area);

        if focused {
            let col = (label.width() + value.width()) as u16;
            let x = (field_area.x + col).min(field_area.right().saturating_sub(1));
            frame.set_cursor_position((x, field_area.y));
        }
    }
}
