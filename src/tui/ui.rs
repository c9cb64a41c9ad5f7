use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ChatList, Conversation, ErrorBanner, StatusBar, TabBar, TabGrid, ToolPanel,
};
use crate::tui::{Overlay, TuiState};

/// Screen layout, top to bottom:
///
/// ```text
/// ┌ tab strip (1) ───────────────────────────┐
/// │ error banner (3, only while set)         │
/// │ conversation / grid / empty state        │
/// │ input box (3..7)                         │
/// └ status bar (1) ──────────────────────────┘
/// ```
///
/// Overlays (directory, tools) are drawn last, on top of everything.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let error_height = if app.error.is_some() {
        ErrorBanner::HEIGHT
    } else {
        0
    };
    let input_height = tui.input_box.calculate_height(area.width);
    let [tab_area, error_area, main_area, input_area, status_area] = Layout::vertical([
        Length(1),
        Length(error_height),
        Min(0),
        Length(input_height),
        Length(1),
    ])
    .areas(area);

    let labels = app.tab_labels();
    TabBar::new(&labels, spinner_frame).render(frame, tab_area);

    if let Some(error) = &app.error {
        ErrorBanner::new(error).render(frame, error_area);
    }

    draw_main(frame, main_area, app, tui, spinner_frame);

    tui.input_box.render(frame, input_area);

    let active_tool = app
        .active_tool
        .and_then(|id| app.tools.iter().find(|t| t.id == id))
        .map(|t| t.name.as_str());
    StatusBar::new(&tui.api_url, active_tool, app.loading_tools(), tui.grid_view)
        .render(frame, status_area);

    match &mut tui.overlay {
        Some(Overlay::Directory(state)) => {
            ChatList::new(state, &app.chats, &app.tab_order).render(frame, area);
        }
        Some(Overlay::Tools(state)) => {
            ToolPanel::new(
                state,
                &app.tools,
                app.active_tool,
                app.loading_tools(),
                app.active_tab.is_some(),
            )
            .render(frame, area);
        }
        None => {}
    }
}

fn draw_main(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    if app.tab_order.is_empty() {
        draw_empty_state(frame, area);
        return;
    }

    if tui.grid_view {
        TabGrid::new(app, &mut tui.conversations, spinner_frame).render(frame, area);
        return;
    }

    if let Some(chat) = app.active_chat_state() {
        let state = tui.conversations.entry(chat.chat.id).or_default();
        Conversation::new(state, chat, spinner_frame).render(frame, area);
    }
}

fn draw_empty_state(frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::styled("No chat open", Style::default().fg(Color::Gray)),
        Line::default(),
        Line::styled("Ctrl+O  browse chats", dim),
        Line::styled("Ctrl+N  start a new chat", dim),
        Line::styled("Ctrl+T  manage tools", dim),
    ];
    let height = lines.len() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}
