//! Key handling for the movie browser.

use crossterm::event::{KeyCode, KeyModifiers};

use cartelera_api::tmdb::trailer_watch_url;

use crate::state::{BrowserState, FetchRequest, InputMode};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing beyond redrawing.
    Continue,
    /// Leave the browser.
    Quit,
    /// Run a fetch request.
    Fetch(FetchRequest),
    /// Open a URL in the system browser.
    Open(String),
}

impl From<Option<FetchRequest>> for KeyAction {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map_or(Self::Continue, Self::Fetch)
    }
}

/// Dispatches a key press according to the current input mode.
pub fn handle_key(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> KeyAction {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.input_mode {
        InputMode::Search => handle_search_input(state, key),
        InputMode::Normal => handle_normal_input(state, key, page_size),
    }
}

/// Handles key input while editing the query.
fn handle_search_input(state: &mut BrowserState, key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
            return state.submit_search().into();
        }
        KeyCode::Backspace => state.query_pop(),
        KeyCode::Char(c) => state.query_push(c),
        _ => {}
    }
    KeyAction::Continue
}

/// Handles key input in navigation mode.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode, page_size: usize) -> KeyAction {
    match key {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => state.move_up().into(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down().into(),
        KeyCode::PageUp => state.page_up(page_size).into(),
        KeyCode::PageDown => state.page_down(page_size).into(),
        KeyCode::Enter => state.hover_current().into(),
        KeyCode::Char('/') => {
            state.input_mode = InputMode::Search;
            KeyAction::Continue
        }
        KeyCode::Char('o') => state
            .trailer_key()
            .map_or(KeyAction::Continue, |key| KeyAction::Open(trailer_watch_url(key))),
        KeyCode::Esc => {
            state.dismiss_error();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}
