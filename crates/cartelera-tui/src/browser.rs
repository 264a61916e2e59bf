//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use cartelera_api::tmdb::TmdbApi;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::dispatcher::Dispatcher;
use crate::input::{self, KeyAction};
use crate::state::{BrowserState, FetchOutcome};
use crate::ui;

/// Runs the movie browser until the user quits.
///
/// The popular catalog is requested before the first frame is drawn.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<C>(client: Arc<C>, language: String) -> Result<()>
where
    C: TmdbApi + Sync + 'static,
{
    let (dispatcher, mut outcomes) = Dispatcher::new(client, language);
    let mut state = BrowserState::new();
    dispatcher.dispatch(state.begin_catalog_load());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &dispatcher, &mut outcomes).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Applies a fetch outcome and dispatches whatever it triggers.
///
/// A fresh catalog triggers the trailer fetch for its first movie.
pub fn apply_outcome<C>(state: &mut BrowserState, dispatcher: &Dispatcher<C>, outcome: FetchOutcome)
where
    C: TmdbApi + Sync + 'static,
{
    if let Some(request) = state.apply(outcome) {
        dispatcher.dispatch(request);
    }
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    dispatcher: &Dispatcher<C>,
    outcomes: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<()>
where
    C: TmdbApi + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut main_area_height: u16 = 0;

    loop {
        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                if let Event::Key(key) = event.context("failed to read event")?
                    && key.kind == KeyEventKind::Press
                {
                    match input::handle_key(state, key.code, key.modifiers, page_size) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Fetch(request) => dispatcher.dispatch(request),
                        KeyAction::Open(url) => open_trailer(&url),
                        KeyAction::Continue => {}
                    }
                }
            }
            Some(outcome) = outcomes.recv() => apply_outcome(state, dispatcher, outcome),
        }
    }
}

/// Opens the trailer page in the system browser.
fn open_trailer(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open trailer in browser");
    }
}
