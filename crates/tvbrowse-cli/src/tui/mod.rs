//! TUI module for the interactive show browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Search bar component.
pub mod search_bar;
/// Browser state types.
pub mod state;
mod ui;

pub use browser::run_browser;
