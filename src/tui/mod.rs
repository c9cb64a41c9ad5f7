//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values, and runs the
//! `Effect`s that `update()` hands back.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effect Execution
//!
//! Each effect runs on its own tokio task via [`perform`]. The resulting
//! action comes back over an `mpsc` channel and is drained once per loop
//! iteration, so the reducer only ever runs on the UI thread. Any number of
//! effects can be in flight at once: each tab's send, directory refreshes,
//! tool operations.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (a tab awaiting a reply, tools syncing): draws every ~80ms so
//!   spinners move.
//! - **Idle**: sleeps up to 500ms, only redraws on events or when a
//!   background result arrives.

mod component;
pub mod components;
pub mod event;
mod ui;

use std::collections::HashMap;
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::api::{ChatApi, ChatId, HttpChatApi};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::effects::perform;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ChatListEvent, ChatListState, ConversationState, InputBox, InputEvent, ToolPanelEvent,
    ToolPanelState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal overlay currently on screen.
pub enum Overlay {
    Directory(ChatListState),
    Tools(ToolPanelState),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    /// Scroll state per open tab, shared by the tabbed and grid views
    pub conversations: HashMap<ChatId, ConversationState>,
    pub input_box: InputBox,
    pub overlay: Option<Overlay>,
    pub grid_view: bool,
    pub api_url: String,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            conversations: HashMap::new(),
            input_box: InputBox::new(),
            overlay: None,
            grid_view: config.grid_view,
            api_url: config.api_base_url.clone(),
        }
    }

    /// Sync props derived from `App` before drawing.
    pub fn sync(&mut self, app: &App) {
        self.input_box.blocked = match app.active_chat_state() {
            None => Some("Open a chat to start typing"),
            Some(chat) if chat.is_loading() => Some("Waiting for reply…"),
            Some(_) => None,
        };
        self.conversations.retain(|id, _| app.is_open(*id));
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Alt+Shift+arrows and Shift+Enter through;
        // terminals that don't support it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Runs effects in the background and routes their results back to the loop.
struct EffectRunner {
    api: Arc<dyn ChatApi>,
    tx: mpsc::Sender<Action>,
}

impl EffectRunner {
    /// Apply `action` and start whatever I/O it asks for. Returns true on quit.
    fn dispatch(&self, app: &mut App, action: Action) -> bool {
        match update(app, action) {
            Effect::None => false,
            Effect::Quit => true,
            effect => {
                self.spawn(effect);
                false
            }
        }
    }

    fn spawn(&self, effect: Effect) {
        debug!("Spawning effect: {:?}", effect);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(action) = perform(effect, api.as_ref()).await
                && tx.send(action).is_err()
            {
                warn!("Failed to deliver effect result: receiver dropped");
            }
        });
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(
        config.api_base_url.clone(),
        config.request_timeout,
    ));
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e));

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runner = EffectRunner { api, tx };

    runner.dispatch(&mut app, Action::LoadChats);
    runner.dispatch(&mut app, Action::LoadTools);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync(&app);

        let busy = app.loading_tools() || app.open_chats.values().any(|c| c.is_loading());
        if busy {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(event, &mut app, &mut tui, &runner) {
                break 'main;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if runner.dispatch(&mut app, action) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns true when the app should quit.
fn handle_event(event: TuiEvent, app: &mut App, tui: &mut TuiState, runner: &EffectRunner) -> bool {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return runner.dispatch(app, Action::Quit),
        _ => {}
    }

    // An open overlay takes every other key
    if tui.overlay.is_some() {
        return handle_overlay_event(&event, app, tui, runner);
    }

    let action = match event {
        TuiEvent::OpenDirectory => {
            tui.overlay = Some(Overlay::Directory(ChatListState::new()));
            Some(Action::LoadChats)
        }
        TuiEvent::OpenTools => {
            tui.overlay = Some(Overlay::Tools(ToolPanelState::new()));
            None
        }
        TuiEvent::NewChat => Some(Action::CreateChat),
        TuiEvent::Reload => {
            runner.dispatch(app, Action::LoadTools);
            Some(Action::LoadChats)
        }
        TuiEvent::CloseTab => app.active_tab.map(Action::CloseTab),
        TuiEvent::ClearHistory => app.active_tab.map(Action::ClearHistory),
        TuiEvent::NextTab => Some(Action::CycleTab(1)),
        TuiEvent::PrevTab => Some(Action::CycleTab(-1)),
        TuiEvent::MoveTabLeft | TuiEvent::MoveTabRight => active_index(app).and_then(|from| {
            let to = if event == TuiEvent::MoveTabLeft {
                from.checked_sub(1)?
            } else {
                from + 1
            };
            Some(Action::ReorderTabs { from, to })
        }),
        TuiEvent::ToggleGrid => {
            tui.grid_view = !tui.grid_view;
            None
        }
        TuiEvent::Escape => app.error.is_some().then_some(Action::DismissError),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            if let Some(id) = app.active_tab {
                tui.conversations.entry(id).or_default().handle_event(&event);
            }
            None
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Submit(content)) => app
                .active_tab
                .map(|chat_id| Action::SendMessage { chat_id, content }),
            _ => None,
        },
    };

    action.is_some_and(|action| runner.dispatch(app, action))
}

/// Route an event to the open overlay. Returns true when the app should quit.
fn handle_overlay_event(
    event: &TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    runner: &EffectRunner,
) -> bool {
    let (action, close) = match tui.overlay.as_mut() {
        Some(Overlay::Directory(state)) => match state.handle_event(event, &app.chats) {
            Some(ChatListEvent::Open(id)) => (Some(Action::OpenChat(id)), true),
            Some(ChatListEvent::CreateNew) => (Some(Action::CreateChat), true),
            Some(ChatListEvent::Delete(id)) => (Some(Action::DeleteChat(id)), false),
            Some(ChatListEvent::Reload) => (Some(Action::LoadChats), false),
            Some(ChatListEvent::Dismiss) => (None, true),
            None => (None, false),
        },
        Some(Overlay::Tools(state)) => {
            let can_assign = app.active_tab.is_some();
            match state.handle_event(event, &app.tools, can_assign) {
                Some(ToolPanelEvent::Assign(tool_id)) => (
                    app.active_tab
                        .map(|chat_id| Action::AssignTool { chat_id, tool_id }),
                    false,
                ),
                Some(ToolPanelEvent::Create(data)) => (Some(Action::CreateTool(data)), false),
                Some(ToolPanelEvent::Update(id, update)) => {
                    (Some(Action::UpdateTool { id, update }), false)
                }
                Some(ToolPanelEvent::Delete(id)) => (Some(Action::DeleteTool(id)), false),
                Some(ToolPanelEvent::Refresh) => (Some(Action::LoadTools), false),
                Some(ToolPanelEvent::Dismiss) => (None, true),
                None => (None, false),
            }
        }
        None => (None, false),
    };

    if close {
        tui.overlay = None;
    }
    action.is_some_and(|action| runner.dispatch(app, action))
}

fn active_index(app: &App) -> Option<usize> {
    let active = app.active_tab?;
    app.tab_order.iter().position(|id| *id == active)
}
