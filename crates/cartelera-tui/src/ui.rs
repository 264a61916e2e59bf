//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};

use cartelera_api::tmdb::{trailer_embed_url, trailer_watch_url};

use crate::state::{BrowserState, InputMode};

/// Screen title.
const TITLE: &str = " Películas ";
/// Placeholder shown in an empty search box.
const SEARCH_PLACEHOLDER: &str = "Buscar películas...";
/// Status line while the catalog loads.
const LOADING_TEXT: &str = "Cargando películas...";
/// Heading of the trailer pane.
const TRAILER_HEADING: &str = "Reproduciendo tráiler:";

/// Draws the browser. Returns the movie list height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Length(1), // status line
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search(frame, chunks[0], state);
    draw_status(frame, chunks[1], state);

    let main_area = chunks[2];
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_area);

    draw_movie_list(frame, pane_chunks[0], state);
    draw_trailer(frame, pane_chunks[1], state);

    draw_footer(frame, chunks[3], state);

    main_area.height
}

/// Draws the search box and result count.
#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let editing = state.input_mode == InputMode::Search;
    let search_line = if state.query().is_empty() && !editing {
        Line::from(Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else if editing {
        Line::from(vec![
            Span::raw(state.query()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(state.query())
    };

    let search_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_line).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(TITLE)
            .title_bottom(" /: Buscar "),
    );
    frame.render_widget(search, header_chunks[0]);

    let count = Paragraph::new(format!(
        "{} / {}",
        state.filtered().len(),
        state.catalog().len()
    ))
    .block(Block::default().borders(Borders::ALL).title(" Mostrando "));
    frame.render_widget(count, header_chunks[1]);
}

/// Draws the loading indicator or the current error.
fn draw_status(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let line = if state.is_loading() {
        Line::from(Span::styled(
            LOADING_TEXT,
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = state.error() {
        Line::from(Span::styled(
            error.message(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the movie list pane (left).
fn draw_movie_list(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let header = Row::new(vec!["Título", "Año", "Nota"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let hovered = state.hovered();
    let rows: Vec<Row> = state
        .filtered()
        .iter()
        .map(|m| {
            let style = if Some(m.id) == hovered && state.trailer_key().is_some() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![
                m.title.clone(),
                m.release_year()
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
                format!("{:.1}", m.vote_average),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Populares ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the trailer and synopsis pane (right).
fn draw_trailer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = Vec::new();

    if let Some(key) = state.trailer_key() {
        lines.push(Line::from(Span::styled(TRAILER_HEADING, bold)));
        lines.push(Line::from(trailer_embed_url(key)));
        lines.push(Line::from(Span::styled(trailer_watch_url(key), dim)));
        if let Some(movie) = state.selected_movie() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(movie.title.clone(), bold)));
            lines.push(Line::from(movie.overview.clone()));
        }
    } else {
        lines.push(Line::from(Span::styled("Sin tráiler", dim)));
    }

    if let Some(poster) = state.current_movie().and_then(|m| m.poster_url()) {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Póster: ", dim),
            Span::raw(poster),
        ]));
    }

    let pane = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Tráiler "));
    frame.render_widget(pane, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = match state.input_mode {
        InputMode::Search => Line::from("Type to search | Enter: search | Esc: cancel"),
        InputMode::Normal => Line::from(vec![Span::raw(
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: trailer  /: search  o: open  Esc: dismiss  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cartelera_api::tmdb::TmdbMovie;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::state::{FetchOutcome, FetchRequest};

    fn render(state: &mut BrowserState) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| {
            draw(frame, state);
        })
        .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn loaded_state() -> BrowserState {
        let mut state = BrowserState::new();
        let FetchRequest::Catalog { ticket } = state.begin_catalog_load() else {
            unreachable!();
        };
        let follow_up = state.apply(FetchOutcome::Catalog {
            ticket,
            result: Ok(vec![TmdbMovie {
                id: 603,
                title: String::from("Matrix"),
                original_title: None,
                original_language: None,
                overview: String::from("Neo despierta"),
                release_date: Some(String::from("1999-03-30")),
                poster_path: Some(String::from("/p.jpg")),
                popularity: 0.0,
                vote_average: 8.2,
            }]),
        });
        if let Some(FetchRequest::Trailer { ticket, movie_id }) = follow_up {
            state.apply(FetchOutcome::Trailer {
                ticket,
                movie_id,
                result: Ok(Some(String::from("vKQi3bBA1y8"))),
            });
        }
        state
    }

    #[test]
    fn test_draw_loading_state() {
        // Arrange
        let mut state = BrowserState::new();
        let _ = state.begin_catalog_load();

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Cargando películas..."));
        assert!(screen.contains("Buscar películas..."));
        assert!(screen.contains("Sin tráiler"));
    }

    #[test]
    fn test_draw_trailer_and_synopsis() {
        // Arrange
        let mut state = loaded_state();

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Reproduciendo tráiler:"));
        assert!(screen.contains("https://www.youtube.com/embed/vKQi3bBA1y8"));
        assert!(screen.contains("Neo despierta"));
        assert!(screen.contains("1999"));
        assert!(!screen.contains("Cargando"));
    }

    #[test]
    fn test_draw_returns_main_area_height() {
        // Arrange
        let mut state = BrowserState::new();
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut height = 0;

        // Act
        terminal
            .draw(|frame| {
                height = draw(frame, &mut state);
            })
            .unwrap();

        // Assert: 30 rows minus search (3), status (1) and footer (3)
        assert_eq!(height, 23);
    }
}
