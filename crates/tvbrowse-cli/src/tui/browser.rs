//! Show browser TUI main loop.

use std::io;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tvbrowse_api::tvmaze::{LocalTvmazeApi, running_shows};

use super::search_bar::SearchFocus;
use super::state::{ActivePane, BrowseAction, BrowseState};
use super::ui;

/// Runs the show browser TUI, starting from the top-rated running shows.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser(api: &(impl LocalTvmazeApi + Sync), running_limit: usize) -> Result<()> {
    let mut state = match running_shows(api, running_limit).await {
        Ok(shows) => BrowseState::new("Running shows", shows),
        Err(e) => {
            tracing::warn!("Failed to load running shows: {e:#}");
            let mut state = BrowseState::new("Running shows", Vec::new());
            state.set_error(&e);
            state
        }
    };

    enable_raw_mode().context("failed to enable raw mode")?;
    let result = run_in_alternate_screen(&mut state, api).await;

    // Both restore steps run even if the loop or one of them failed.
    let restored = restore_terminal();
    first_error([result, restored])
}

/// Enters the alternate screen and runs the event loop on it.
async fn run_in_alternate_screen(
    state: &mut BrowseState,
    api: &(impl LocalTvmazeApi + Sync),
) -> Result<()> {
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    run_event_loop(&mut terminal, state, api).await
}

/// Leaves raw mode and the alternate screen, attempting both steps.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = crossterm::execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    first_error([raw, screen])
}

/// Returns the first error among already evaluated steps.
fn first_error<const N: usize>(steps: [Result<()>; N]) -> Result<()> {
    steps.into_iter().collect()
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowseState,
    api: &(impl LocalTvmazeApi + Sync),
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if !event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")? {
            continue;
        }
        let action = match event::read().context("failed to read event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
            Event::Mouse(mouse) => handle_mouse(state, mouse),
            _ => None,
        };
        let Some(action) = action else {
            continue;
        };

        if begin(state, &action) {
            terminal
                .draw(|frame| ui::draw(frame, state))
                .context("failed to draw TUI")?;
        }
        if !dispatch(api, state, action).await {
            return Ok(());
        }
    }
}

/// Handles a key press. Returns the action the loop must run, if any.
fn handle_key(state: &mut BrowseState, key: KeyEvent) -> Option<BrowseAction> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(BrowseAction::Quit);
        }
        KeyCode::Esc => {
            if state.active_pane == ActivePane::Search
                && state.search_bar.focus() == SearchFocus::Input
            {
                state.active_pane = ActivePane::Results;
                return None;
            }
            return Some(BrowseAction::Quit);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            state.cycle_focus();
            return None;
        }
        _ => {}
    }

    match state.active_pane {
        ActivePane::Search => state.search_bar.handle_key(key.code).map(BrowseAction::from),
        ActivePane::Results => handle_results_key(state, key.code),
    }
}

/// Handles a key press while the result table has focus.
fn handle_results_key(state: &mut BrowseState, key: KeyCode) -> Option<BrowseAction> {
    match key {
        KeyCode::Char('q') => return Some(BrowseAction::Quit),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Enter => {
            return state
                .selected_show()
                .map(|show| BrowseAction::LoadDetail(show.id));
        }
        KeyCode::Char('o') => {
            return state.current_url().map(|url| BrowseAction::OpenUrl(String::from(url)));
        }
        KeyCode::Char('/') => state.focus_search(),
        _ => {}
    }
    None
}

/// Handles a mouse event. Only left clicks on the search button act.
fn handle_mouse(state: &mut BrowseState, mouse: MouseEvent) -> Option<BrowseAction> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let action = state
        .search_bar
        .handle_click(mouse.column, mouse.row)
        .map(BrowseAction::from);
    if action.is_some() {
        state.active_pane = ActivePane::Search;
    }
    action
}

/// Marks a request as started. Returns `true` if the screen should be redrawn first.
fn begin(state: &mut BrowseState, action: &BrowseAction) -> bool {
    match action {
        BrowseAction::Search(query) => {
            state.set_loading(format!("Searching \"{query}\""));
            true
        }
        BrowseAction::LoadDetail(id) => {
            state.set_loading(format!("Loading show {id}"));
            true
        }
        BrowseAction::OpenUrl(_) | BrowseAction::Quit => false,
    }
}

/// Runs an action against the API. Returns `false` when the browser should exit.
async fn dispatch(
    api: &(impl LocalTvmazeApi + Sync),
    state: &mut BrowseState,
    action: BrowseAction,
) -> bool {
    match action {
        BrowseAction::Quit => return false,
        BrowseAction::Search(query) => match api.search_shows(&query).await {
            Ok(shows) => state.show_search_results(&query, shows),
            Err(e) => {
                tracing::warn!("Search failed: {e:#}");
                state.set_error(&e.context(format!("search for \"{query}\" failed")));
            }
        },
        BrowseAction::LoadDetail(id) => match api.get_show_with_cast(id).await {
            Ok(detail) => state.show_detail(detail),
            Err(e) => {
                tracing::warn!("Loading show {id} failed: {e:#}");
                state.set_error(&e.context(format!("failed to load show {id}")));
            }
        },
        BrowseAction::OpenUrl(url) => {
            if let Err(e) = open::that(&url) {
                state.set_error(&anyhow!(e).context(format!("failed to open {url}")));
            }
        }
    }
    true
}
