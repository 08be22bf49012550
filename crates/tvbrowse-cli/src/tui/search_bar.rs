//! Search bar component: a text input and a search button.
//!
//! The component owns nothing but the typed text and which of its two
//! elements has focus. Submitting (Enter in the input, Enter/Space on the
//! focused button, or a mouse click on the button) yields a
//! [`SearchEvent`] carrying the trimmed text, unless nothing but
//! whitespace was typed.

use crossterm::event::KeyCode;
use ratatui::layout::{Position, Rect};

/// Element of the search bar that receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Text input.
    Input,
    /// Search button.
    Button,
}

/// Event emitted by the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Run a search for the contained query.
    Search(String),
}

/// Search bar state.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchBar {
    /// Text typed so far.
    query: String,
    /// Focused element.
    focus: SearchFocus,
    /// Screen area of the button from the last render.
    button_area: Option<Rect>,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    /// Creates an empty search bar with the input focused.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: String::new(),
            focus: SearchFocus::Input,
            button_area: None,
        }
    }

    /// Returns the current text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the focused element.
    #[must_use]
    pub const fn focus(&self) -> SearchFocus {
        self.focus
    }

    /// Focuses the text input.
    pub const fn focus_input(&mut self) {
        self.focus = SearchFocus::Input;
    }

    /// Focuses the search button.
    pub const fn focus_button(&mut self) {
        self.focus = SearchFocus::Button;
    }

    /// Records where the button was drawn so clicks can be hit-tested.
    pub const fn set_button_area(&mut self, area: Rect) {
        self.button_area = Some(area);
    }

    /// Handles a key press on the focused element.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<SearchEvent> {
        match (self.focus, key) {
            (SearchFocus::Input, KeyCode::Enter)
            | (SearchFocus::Button, KeyCode::Enter | KeyCode::Char(' ')) => self.submit(),
            (SearchFocus::Input, KeyCode::Char(c)) => {
                self.query.push(c);
                None
            }
            (SearchFocus::Input, KeyCode::Backspace) => {
                self.query.pop();
                None
            }
            _ => None,
        }
    }

    /// Handles a left click at the given terminal cell.
    ///
    /// A click on the button focuses it and submits; any other click is ignored.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Option<SearchEvent> {
        let area = self.button_area?;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        self.focus = SearchFocus::Button;
        self.submit()
    }

    /// Emits the trimmed text as a search, unless it is blank.
    #[must_use]
    pub fn submit(&self) -> Option<SearchEvent> {
        let query = self.query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring empty search submit");
            return None;
        }
        Some(SearchEvent::Search(String::from(query)))
    }
}
