//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TabBar`: Tab strip with the active tab and pending spinners
//! - `StatusBar`: Connection, active tool and key hints
//! - `ErrorBanner`: The global error, until dismissed
//! - `Message`: One conversation bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `InputBox`: Message composer, collapsible
//! - `Conversation`: Scrollable view of one tab (state kept per tab)
//! - `TabGrid`: All open tabs tiled, reusing the per-tab conversation state
//! - `ChatList`: Directory overlay (open, create, delete)
//! - `ToolPanel`: Tool registry overlay (assign, create, edit, delete)
//!
//! Overlays use a persistent `*State` in `TuiState` plus a transient
//! wrapper built each frame around borrowed `App` data.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── tab_bar.rs
//! ├── status_bar.rs
//! ├── error_banner.rs
//! ├── message.rs       (single bubble renderer)
//! ├── conversation.rs  (scrollable message container)
//! ├── grid.rs
//! ├── input_box.rs
//! ├── chat_list.rs
//! └── tool_panel.rs
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

pub mod chat_list;
pub mod conversation;
pub mod error_banner;
pub mod grid;
pub mod input_box;
pub mod message;
pub mod status_bar;
pub mod tab_bar;
pub mod tool_panel;

pub use chat_list::{ChatList, ChatListEvent, ChatListState};
pub use conversation::{Conversation, ConversationState};
pub use error_banner::ErrorBanner;
pub use grid::TabGrid;
pub use input_box::{InputBox, InputEvent};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
pub use tool_panel::{ToolPanel, ToolPanelEvent, ToolPanelState};

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
