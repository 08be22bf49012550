//! Browse screen state management.

use ratatui::widgets::TableState;
use tvbrowse_api::tvmaze::{Show, ShowWithEmbeds};

use super::search_bar::{SearchBar, SearchEvent, SearchFocus};

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Search bar (input or button).
    Search,
    /// Result table.
    Results,
}

/// Work the event loop must perform after a key or mouse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    /// Search shows by the given query.
    Search(String),
    /// Load cast and episodes for a show.
    LoadDetail(u64),
    /// Open a URL in the system browser.
    OpenUrl(String),
    /// Leave the browser.
    Quit,
}

impl From<SearchEvent> for BrowseAction {
    fn from(event: SearchEvent) -> Self {
        match event {
            SearchEvent::Search(query) => Self::Search(query),
        }
    }
}

/// Status line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Informational message.
    Info(String),
    /// A request is in flight.
    Loading(String),
    /// Last request failed.
    Error(String),
}

/// State for the browse TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowseState {
    /// Search bar component.
    pub search_bar: SearchBar,
    /// Focused pane.
    pub active_pane: ActivePane,
    /// Heading of the current result list (e.g. "Running shows").
    pub listing_title: String,
    /// Shows in the result table.
    pub shows: Vec<Show>,
    /// Table state for the result list (selection and scroll).
    pub table_state: TableState,
    /// Detail of the most recently opened show.
    pub detail: Option<ShowWithEmbeds>,
    /// Status line.
    pub status: StatusLine,
}

impl BrowseState {
    /// Creates a new state with an initial listing.
    #[must_use]
    pub fn new(listing_title: impl Into<String>, shows: Vec<Show>) -> Self {
        let mut state = Self {
            search_bar: SearchBar::new(),
            active_pane: ActivePane::Search,
            listing_title: String::new(),
            shows: Vec::new(),
            table_state: TableState::default(),
            detail: None,
            status: StatusLine::Info(String::from("Type a show name and press Enter")),
        };
        state.set_listing(listing_title, shows);
        state
    }

    /// Replaces the result list and resets the selection.
    pub fn set_listing(&mut self, title: impl Into<String>, shows: Vec<Show>) {
        self.listing_title = title.into();
        self.shows = shows;
        self.table_state = TableState::default();
        if !self.shows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    /// Returns the currently selected show.
    #[must_use]
    pub fn selected_show(&self) -> Option<&Show> {
        self.table_state
            .selected()
            .and_then(|idx| self.shows.get(idx))
    }

    /// Moves the selection up one row.
    pub fn move_up(&mut self) {
        if let Some(idx) = self.table_state.selected() {
            self.table_state.select(Some(idx.saturating_sub(1)));
        }
    }

    /// Moves the selection down one row.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        if let Some(idx) = self.table_state.selected()
            && idx + 1 < self.shows.len()
        {
            self.table_state.select(Some(idx + 1));
        }
    }

    /// Cycles focus: input, button, results, then back to input.
    pub fn cycle_focus(&mut self) {
        match (self.active_pane, self.search_bar.focus()) {
            (ActivePane::Search, SearchFocus::Input) => self.search_bar.focus_button(),
            (ActivePane::Search, SearchFocus::Button) => self.active_pane = ActivePane::Results,
            (ActivePane::Results, _) => {
                self.active_pane = ActivePane::Search;
                self.search_bar.focus_input();
            }
        }
    }

    /// Focuses the search input.
    pub fn focus_search(&mut self) {
        self.active_pane = ActivePane::Search;
        self.search_bar.focus_input();
    }

    /// Records that a request started.
    pub fn set_loading(&mut self, what: impl Into<String>) {
        self.status = StatusLine::Loading(what.into());
    }

    /// Records a request failure.
    pub fn set_error(&mut self, err: &anyhow::Error) {
        self.status = StatusLine::Error(format!("{err:#}"));
    }

    /// Records an informational message.
    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status = StatusLine::Info(msg.into());
    }

    /// Shows search results; focus moves to the table when there are any.
    pub fn show_search_results(&mut self, query: &str, shows: Vec<Show>) {
        let count = shows.len();
        self.set_listing(format!("Search: {query}"), shows);
        self.detail = None;
        if count == 0 {
            self.set_info(format!("No shows found for \"{query}\""));
        } else {
            self.set_info(format!("{count} result(s) for \"{query}\""));
            self.active_pane = ActivePane::Results;
        }
    }

    /// Shows the detail of a show.
    pub fn show_detail(&mut self, detail: ShowWithEmbeds) {
        self.set_info(format!(
            "{}: {} cast, {} episodes",
            detail.show.name,
            detail.embedded.cast.len(),
            detail.embedded.episodes.len()
        ));
        self.detail = Some(detail);
    }

    /// Returns the TVmaze page of the show in focus (detail first, then selection).
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .map(|d| &d.show)
            .or_else(|| self.selected_show())
            .and_then(|show| show.url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn make_show(id: u64, name: &str) -> Show {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "url": format!("https://www.tvmaze.com/shows/{id}"),
        }))
        .unwrap()
    }

    fn make_state() -> BrowseState {
        BrowseState::new(
            "Running shows",
            vec![make_show(1, "A"), make_show(2, "B"), make_show(3, "C")],
        )
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = make_state();

        // Assert
        assert_eq!(state.active_pane, ActivePane::Search);
        assert_eq!(state.listing_title, "Running shows");
        assert_eq!(state.selected_show().unwrap().id, 1);
        assert!(state.detail.is_none());
    }

    #[test]
    fn test_empty_listing_has_no_selection() {
        // Arrange & Act
        let state = BrowseState::new("Empty", vec![]);

        // Assert
        assert!(state.selected_show().is_none());
        assert!(state.current_url().is_none());
    }

    #[test]
    fn test_move_down_up_clamps() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.selected_show().unwrap().id, 3);

        state.move_up();
        state.move_up();
        state.move_up();
        assert_eq!(state.selected_show().unwrap().id, 1);
    }

    #[test]
    fn test_cycle_focus() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        state.cycle_focus();
        assert_eq!(state.active_pane, ActivePane::Search);
        assert_eq!(state.search_bar.focus(), SearchFocus::Button);

        state.cycle_focus();
        assert_eq!(state.active_pane, ActivePane::Results);

        state.cycle_focus();
        assert_eq!(state.active_pane, ActivePane::Search);
        assert_eq!(state.search_bar.focus(), SearchFocus::Input);
    }

    #[test]
    fn test_search_results_replace_listing() {
        // Arrange
        let mut state = make_state();

        // Act
        state.show_search_results("lost", vec![make_show(123, "Lost")]);

        // Assert
        assert_eq!(state.listing_title, "Search: lost");
        assert_eq!(state.shows.len(), 1);
        assert_eq!(state.selected_show().unwrap().name, "Lost");
        assert_eq!(state.active_pane, ActivePane::Results);
    }

    #[test]
    fn test_empty_search_results_keep_focus_on_search() {
        // Arrange
        let mut state = make_state();

        // Act
        state.show_search_results("zzzz", vec![]);

        // Assert
        assert!(state.shows.is_empty());
        assert_eq!(state.active_pane, ActivePane::Search);
        assert_eq!(
            state.status,
            StatusLine::Info(String::from("No shows found for \"zzzz\""))
        );
    }

    #[test]
    fn test_set_error_shows_chain() {
        // Arrange
        let mut state = make_state();
        let err = anyhow::anyhow!("TVmaze API error: 500").context("search failed");

        // Act
        state.set_error(&err);

        // Assert
        assert_eq!(
            state.status,
            StatusLine::Error(String::from("search failed: TVmaze API error: 500"))
        );
    }

    #[test]
    fn test_current_url_prefers_detail() {
        // Arrange
        let mut state = make_state();
        let detail: ShowWithEmbeds = serde_json::from_value(serde_json::json!({
            "id": 169,
            "name": "Breaking Bad",
            "url": "https://www.tvmaze.com/shows/169/breaking-bad",
        }))
        .unwrap();

        // Act
        let before = state.current_url().map(String::from);
        state.show_detail(detail);

        // Assert
        assert_eq!(before.as_deref(), Some("https://www.tvmaze.com/shows/1"));
        assert_eq!(
            state.current_url(),
            Some("https://www.tvmaze.com/shows/169/breaking-bad")
        );
    }

    #[test]
    fn test_search_event_converts_to_action() {
        // Arrange
        let event = SearchEvent::Search(String::from("Lost"));

        // Act
        let action = BrowseAction::from(event);

        // Assert
        assert_eq!(action, BrowseAction::Search(String::from("Lost")));
    }
}
