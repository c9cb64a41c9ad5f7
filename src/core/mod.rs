//! # Core Application Logic
//!
//! This module contains tabchat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • perform() (effects)  │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │  ChatApi   │
//!           │  Adapter   │              │  (trait)   │
//!           │ (ratatui)  │              │            │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`effects`]: Runs the I/O an `update()` asked for
//! - [`tabs`]: Tab order and tab label helpers
//! - [`content`]: Structured vs plain assistant message bodies
//! - [`config`]: `~/.tabchat/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod content;
pub mod effects;
pub mod state;
pub mod tabs;
