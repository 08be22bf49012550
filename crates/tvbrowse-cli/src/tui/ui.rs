//! TUI rendering logic for the show browser.

use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};
use tvbrowse_api::tvmaze::{Show, ShowWithEmbeds};

use super::search_bar::SearchFocus;
use super::state::{ActivePane, BrowseState, StatusLine};

/// Cast members listed in the detail pane.
const MAX_CAST_LINES: usize = 10;

/// Label of the search button.
const SEARCH_BUTTON_LABEL: &str = "Search";

/// Longest entity name tried before the `&` is kept literally.
const MAX_ENTITY_LEN: usize = 32;

/// Turns a TVmaze summary fragment into a single line of plain text.
///
/// Tags are dropped. Line-breaking tags (`<br>`, `</p>`) become spaces so
/// paragraphs do not run together. Whitespace runs collapse to one space.
#[must_use]
pub fn plain_text(html: &str) -> String {
    let decoded = decode_entities(&strip_tags(html));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes tags, replacing line-breaking ones with a space.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let name = tag.trim().trim_start_matches('/').trim_start();
        let breaks = ["br", "p"].iter().any(|b| {
            name.get(..b.len()).is_some_and(|p| p.eq_ignore_ascii_case(b))
                && !name
                    .chars()
                    .nth(b.len())
                    .is_some_and(|c| c.is_ascii_alphanumeric())
        });
        if breaks {
            out.push(' ');
        }
    }
    out
}

/// Decodes named and numeric (`&#39;`, `&#x27;`) entities in one pass.
///
/// Unknown or unterminated entities are kept as written.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (text, tail) = rest.split_at(amp);
        out.push_str(text);
        let body = tail.get(1..).unwrap_or_default();
        let decoded = body
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| body.get(..end).and_then(decode_entity).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = body.get(end.saturating_add(1)..).unwrap_or_default();
            }
            None => {
                out.push('&');
                rest = body;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes a single entity name (without `&` and `;`).
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Formats an optional rating average for display.
fn fmt_rating(show: &Show) -> String {
    show.rating_average()
        .map_or_else(|| String::from("--"), |avg| format!("{avg:.1}"))
}

/// Border style for a focusable element.
fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Draws the browser UI and records the search button area for mouse hit-tests.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Min(5),    // main content
            Constraint::Length(1), // status line
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search_bar(frame, chunks[0], state);

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_results(frame, pane_chunks[0], state);
    draw_detail(frame, pane_chunks[1], state);
    draw_status(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);
}

/// Draws the text input and the search button.
#[allow(clippy::indexing_slicing)]
fn draw_search_bar(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let bar_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(12)])
        .split(area);

    let in_search = state.active_pane == ActivePane::Search;
    let input_focused = in_search && state.search_bar.focus() == SearchFocus::Input;
    let button_focused = in_search && state.search_bar.focus() == SearchFocus::Button;

    let input = Paragraph::new(state.search_bar.query()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(input_focused))
            .title(" Show name "),
    );
    frame.render_widget(input, bar_chunks[0]);

    let button_style = if button_focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(SEARCH_BUTTON_LABEL, button_style)))
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(button_focused)),
        );
    frame.render_widget(button, bar_chunks[1]);
    state.search_bar.set_button_area(bar_chunks[1]);

    if input_focused {
        let cursor_x = u16::try_from(state.search_bar.query().chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(bar_chunks[0].x)
            .saturating_add(1)
            .min(bar_chunks[0].right().saturating_sub(2));
        frame.set_cursor_position((cursor_x, bar_chunks[0].y.saturating_add(1)));
    }
}

/// Draws the result table (left pane).
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowseState) {
    let header = Row::new(vec!["Name", "Rating", "Type", "Status"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .shows
        .iter()
        .map(|show| {
            Row::new(vec![
                show.name.clone(),
                fmt_rating(show),
                show.show_type.clone().unwrap_or_default(),
                show.status.clone().unwrap_or_default(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Length(16),
    ];

    let title = format!(" {} ({}) ", state.listing_title, state.shows.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(focus_style(state.active_pane == ActivePane::Results)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Builds the heading lines shared by the selection and detail views.
fn show_lines(show: &Show) -> Vec<Line<'static>> {
    let mut meta = vec![
        show.show_type.clone(),
        show.status.clone(),
        show.premiered.clone(),
        show.network.as_ref().map(|n| n.name.clone()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    meta.push(format!("rating {}", fmt_rating(show)));

    let mut lines = vec![
        Line::from(Span::styled(
            show.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta.join(" | ")),
    ];
    if let Some(genres) = show.genres.as_ref().filter(|g| !g.is_empty()) {
        lines.push(Line::from(format!("Genres: {}", genres.join(", "))));
    }
    if let Some(summary) = show.summary.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(plain_text(summary)));
    }
    lines
}

/// Builds the cast and episode lines of a loaded detail.
fn embed_lines(detail: &ShowWithEmbeds) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), Line::from(Span::styled(
        "Cast",
        Style::default().fg(Color::Yellow),
    ))];
    lines.extend(
        detail
            .embedded
            .cast
            .iter()
            .take(MAX_CAST_LINES)
            .map(|credit| match credit.character.as_ref() {
                Some(character) => Line::from(format!(
                    "  {} as {}",
                    credit.person.name, character.name
                )),
                None => Line::from(format!("  {}", credit.person.name)),
            }),
    );

    let seasons: BTreeSet<u32> = detail
        .embedded
        .episodes
        .iter()
        .filter_map(|ep| ep.season)
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{} episodes in {} season(s)",
        detail.embedded.episodes.len(),
        seasons.len()
    )));
    lines
}

/// Draws the detail pane (right).
fn draw_detail(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let lines = match (state.detail.as_ref(), state.selected_show()) {
        (Some(detail), _) => {
            let mut lines = show_lines(&detail.show);
            lines.extend(embed_lines(detail));
            lines
        }
        (None, Some(show)) => show_lines(show),
        (None, None) => vec![Line::from("No show selected")],
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Detail "));
    frame.render_widget(paragraph, area);
}

/// Draws the single-line status.
fn draw_status(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let line = match &state.status {
        StatusLine::Info(msg) => Line::from(msg.as_str()),
        StatusLine::Loading(msg) => Line::from(Span::styled(
            format!("{msg}..."),
            Style::default().fg(Color::Yellow),
        )),
        StatusLine::Error(msg) => Line::from(Span::styled(
            format!("Error: {msg}"),
            Style::default().fg(Color::Red),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let help_text = match (state.active_pane, state.search_bar.focus()) {
        (ActivePane::Search, SearchFocus::Input) => {
            "Type a name  Enter: search  Tab: focus  Esc: results  Ctrl-C: quit"
        }
        (ActivePane::Search, SearchFocus::Button) => {
            "Enter/Space/click: search  Tab: focus  Esc: quit"
        }
        (ActivePane::Results, _) => {
            "\u{2191}\u{2193}/j/k: move  Enter: detail  o: open  /: search  Tab: focus  q: quit"
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use crossterm::event::KeyCode;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::search_bar::SearchEvent;

    #[test]
    fn test_plain_text_strips_tags() {
        // Arrange
        let html = "<p><b>Breaking Bad</b> follows protagonist Walter White.</p>";

        // Act
        let text = plain_text(html);

        // Assert
        assert_eq!(text, "Breaking Bad follows protagonist Walter White.");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        // Arrange
        let html = "<p>Tom &amp; Jerry&#39;s &quot;show&quot;</p>";

        // Act
        let text = plain_text(html);

        // Assert
        assert_eq!(text, "Tom & Jerry's \"show\"");
    }

    #[test]
    fn test_plain_text_decodes_numeric_entities() {
        // Arrange
        let html = "<p>It&#8217;s a &#x27;cult&#X27; hit</p>";

        // Act
        let text = plain_text(html);

        // Assert
        assert_eq!(text, "It\u{2019}s a 'cult' hit");
    }

    #[test]
    fn test_plain_text_keeps_unknown_entities_and_bare_ampersands() {
        // Arrange
        let html = "Law & Order &bogus; &amp;lt;";

        // Act
        let text = plain_text(html);

        // Assert
        assert_eq!(text, "Law & Order &bogus; &lt;");
    }

    #[test]
    fn test_plain_text_separates_paragraphs_and_breaks() {
        // Arrange
        let html = "<p>First.</p><p>Second.<br/>Third.</p><b>Bold</b>face";

        // Act
        let text = plain_text(html);

        // Assert
        assert_eq!(text, "First. Second. Third. Boldface");
    }

    #[test]
    fn test_plain_text_without_markup() {
        // Arrange & Act & Assert
        assert_eq!(plain_text("  just text "), "just text");
        assert_eq!(plain_text(""), "");
    }

    #[test]
    fn test_draw_records_button_area() {
        // Arrange
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = BrowseState::new("Running shows", vec![]);
        for c in "Lost".chars() {
            state.search_bar.handle_key(KeyCode::Char(c));
        }

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();
        let event = state.search_bar.handle_click(75, 1);

        // Assert
        assert_eq!(event, Some(SearchEvent::Search(String::from("Lost"))));
    }

    #[test]
    fn test_draw_renders_search_button_label() {
        // Arrange
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = BrowseState::new("Running shows", vec![]);

        // Act
        terminal.draw(|frame| draw(frame, &mut state)).unwrap();

        // Assert
        let buffer = terminal.backend().buffer();
        let top_rows: String = (0..3_u16)
            .flat_map(|y| (0..80_u16).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_owned())
            .collect();
        assert!(top_rows.contains(SEARCH_BUTTON_LABEL));
        assert!(top_rows.contains("Show name"));
    }
}
