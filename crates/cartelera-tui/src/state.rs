//! Movie browser view state.
//!
//! `BrowserState` holds one slot per concern (catalog, filtered view,
//! active trailer, error) and is only mutated through its methods.
//! Operations that need the network return a [`FetchRequest`]; the
//! caller runs it and feeds the resulting [`FetchOutcome`] back through
//! [`BrowserState::apply`].
//!
//! Each flow hands out tickets from its own counter. An outcome is
//! committed only while its ticket is the latest one issued for that
//! flow, so a superseded response is dropped instead of overwriting
//! newer state.

use cartelera_api::tmdb::{ErrorKind, TmdbError, TmdbMovie};
use ratatui::widgets::TableState;

/// Generation number attached to a request.
pub type Ticket = u64;

/// One of the three independent fetch flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Popular movies list.
    Catalog,
    /// Video list of one movie.
    Trailer,
    /// Title search.
    Search,
}

impl Flow {
    /// Fixed user-facing message shown when this flow fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Catalog => "Error fetching movies. Please try again later.",
            Self::Trailer => "Error fetching trailer. Please try again later.",
            Self::Search => "Error fetching search results. Please try again later.",
        }
    }
}

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Reason code.
    pub kind: ErrorKind,
    /// Underlying error text, for logs.
    pub detail: String,
}

impl From<TmdbError> for FetchFailure {
    fn from(err: TmdbError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// The failure currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowFailure {
    /// Flow that failed.
    pub flow: Flow,
    /// Cause of the failure.
    pub failure: FetchFailure,
}

impl FlowFailure {
    /// Fixed user-facing message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.flow.failure_message()
    }

    /// Reason code of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.failure.kind
    }
}

/// A network request the view wants to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Fetch the popular movies list.
    Catalog {
        /// Catalog ticket.
        ticket: Ticket,
    },
    /// Fetch the videos of a movie and pick its trailer.
    Trailer {
        /// Trailer ticket.
        ticket: Ticket,
        /// Movie whose trailer is wanted.
        movie_id: u64,
    },
    /// Search movies by title.
    Search {
        /// Search ticket.
        ticket: Ticket,
        /// Query text as typed.
        query: String,
    },
}

/// Completed request, ready to be applied to the state.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Popular movies list result.
    Catalog {
        /// Ticket of the originating request.
        ticket: Ticket,
        /// Movies or failure.
        result: Result<Vec<TmdbMovie>, FetchFailure>,
    },
    /// Trailer lookup result. `Ok(None)` means the movie has no trailer.
    Trailer {
        /// Ticket of the originating request.
        ticket: Ticket,
        /// Movie the videos belong to.
        movie_id: u64,
        /// Trailer key or failure.
        result: Result<Option<String>, FetchFailure>,
    },
    /// Search result.
    Search {
        /// Ticket of the originating request.
        ticket: Ticket,
        /// Matching movies or failure.
        result: Result<Vec<TmdbMovie>, FetchFailure>,
    },
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// List navigation.
    Normal,
    /// Editing the search query.
    Search,
}

/// Per-flow ticket counters.
#[derive(Debug, Default)]
struct Tickets {
    catalog: Ticket,
    trailer: Ticket,
    search: Ticket,
}

/// Issues the next ticket from a counter.
const fn next_ticket(counter: &mut Ticket) -> Ticket {
    *counter = counter.wrapping_add(1);
    *counter
}

/// State of the movie browser view.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Popular movies, as last fetched.
    catalog: Vec<TmdbMovie>,
    /// Movies currently listed (catalog or search results).
    filtered: Vec<TmdbMovie>,
    /// Key of the trailer being shown.
    trailer_key: Option<String>,
    /// Catalog entry of the movie whose trailer is shown.
    selected_movie: Option<TmdbMovie>,
    /// Movie whose trailer was last requested.
    hovered: Option<u64>,
    /// Search box contents.
    query: String,
    /// True while the catalog request is in flight.
    loading: bool,
    /// Most recent failure of any flow.
    error: Option<FlowFailure>,
    /// Ticket counters.
    tickets: Tickets,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Table state for the movie list (handles selection and scroll).
    pub table_state: TableState,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates an empty state. Nothing is fetched until
    /// [`Self::begin_catalog_load`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            filtered: Vec::new(),
            trailer_key: None,
            selected_movie: None,
            hovered: None,
            query: String::new(),
            loading: false,
            error: None,
            tickets: Tickets::default(),
            input_mode: InputMode::Normal,
            table_state: TableState::default(),
        }
    }

    /// Popular movies.
    #[must_use]
    pub fn catalog(&self) -> &[TmdbMovie] {
        &self.catalog
    }

    /// Movies currently listed.
    #[must_use]
    pub fn filtered(&self) -> &[TmdbMovie] {
        &self.filtered
    }

    /// Trailer key being shown, if any.
    #[must_use]
    pub fn trailer_key(&self) -> Option<&str> {
        self.trailer_key.as_deref()
    }

    /// Catalog entry of the movie whose trailer is shown.
    #[must_use]
    pub const fn selected_movie(&self) -> Option<&TmdbMovie> {
        self.selected_movie.as_ref()
    }

    /// Movie whose trailer was last requested.
    #[must_use]
    pub const fn hovered(&self) -> Option<u64> {
        self.hovered
    }

    /// Search box contents.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the catalog request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recent failure.
    #[must_use]
    pub const fn error(&self) -> Option<&FlowFailure> {
        self.error.as_ref()
    }

    /// Row index under the cursor.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn current_movie(&self) -> Option<&TmdbMovie> {
        self.filtered.get(self.cursor()?)
    }

    // --- Flows ---

    /// Starts the catalog flow.
    pub fn begin_catalog_load(&mut self) -> FetchRequest {
        self.loading = true;
        self.error = None;
        FetchRequest::Catalog {
            ticket: next_ticket(&mut self.tickets.catalog),
        }
    }

    /// Starts the trailer flow for `movie_id`, superseding any earlier one.
    pub fn hover(&mut self, movie_id: u64) -> FetchRequest {
        self.hovered = Some(movie_id);
        FetchRequest::Trailer {
            ticket: next_ticket(&mut self.tickets.trailer),
            movie_id,
        }
    }

    /// Requests the trailer of the movie under the cursor again.
    pub fn hover_current(&mut self) -> Option<FetchRequest> {
        let movie_id = self.current_movie()?.id;
        Some(self.hover(movie_id))
    }

    /// Runs the search for the current query.
    ///
    /// A blank query restores the catalog without touching the network.
    /// Either way any search still in flight is superseded.
    pub fn submit_search(&mut self) -> Option<FetchRequest> {
        let ticket = next_ticket(&mut self.tickets.search);
        if self.query.trim().is_empty() {
            let catalog = self.catalog.clone();
            self.replace_filtered(catalog);
            return None;
        }
        Some(FetchRequest::Search {
            ticket,
            query: self.query.clone(),
        })
    }

    /// Applies a completed request. May return a follow-up request.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Option<FetchRequest> {
        match outcome {
            FetchOutcome::Catalog { ticket, result } => {
                if !self.is_current(Flow::Catalog, ticket) {
                    return None;
                }
                self.loading = false;
                match result {
                    Ok(movies) => {
                        self.catalog.clone_from(&movies);
                        self.replace_filtered(movies);
                        let first = self.catalog.first().map(|m| m.id)?;
                        Some(self.hover(first))
                    }
                    Err(failure) => {
                        self.fail(Flow::Catalog, failure);
                        None
                    }
                }
            }
            FetchOutcome::Trailer {
                ticket,
                movie_id,
                result,
            } => {
                if !self.is_current(Flow::Trailer, ticket) {
                    return None;
                }
                match result {
                    Ok(key) => {
                        self.trailer_key = key;
                        self.selected_movie =
                            self.catalog.iter().find(|m| m.id == movie_id).cloned();
                    }
                    Err(failure) => {
                        self.trailer_key = None;
                        self.fail(Flow::Trailer, failure);
                    }
                }
                None
            }
            FetchOutcome::Search { ticket, result } => {
                if !self.is_current(Flow::Search, ticket) {
                    return None;
                }
                match result {
                    Ok(movies) => self.replace_filtered(movies),
                    Err(failure) => self.fail(Flow::Search, failure),
                }
                None
            }
        }
    }

    /// Clears the visible error.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Returns whether `ticket` is the latest one issued for `flow`.
    fn is_current(&self, flow: Flow, ticket: Ticket) -> bool {
        let latest = match flow {
            Flow::Catalog => self.tickets.catalog,
            Flow::Trailer => self.tickets.trailer,
            Flow::Search => self.tickets.search,
        };
        if ticket == latest {
            return true;
        }
        tracing::debug!(?flow, ticket, latest, "discarding superseded fetch outcome");
        false
    }

    /// Records a failure, overwriting any previous one.
    fn fail(&mut self, flow: Flow, failure: FetchFailure) {
        tracing::warn!(?flow, kind = ?failure.kind, detail = %failure.detail, "fetch failed");
        self.error = Some(FlowFailure { flow, failure });
    }

    /// Swaps the listed movies wholesale and puts the cursor on the first row.
    fn replace_filtered(&mut self, movies: Vec<TmdbMovie>) {
        self.filtered = movies;
        if self.filtered.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    // --- Search box ---

    /// Replaces the query.
    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, ch: char) {
        self.query.push(ch);
    }

    /// Removes the last character from the query.
    pub fn query_pop(&mut self) {
        self.query.pop();
    }

    // --- Cursor ---

    /// Moves the cursor up. Landing on a new movie requests its trailer.
    pub fn move_up(&mut self) -> Option<FetchRequest> {
        let current = self.cursor()?;
        self.select_row(current.checked_sub(1)?)
    }

    /// Moves the cursor down. Landing on a new movie requests its trailer.
    pub fn move_down(&mut self) -> Option<FetchRequest> {
        let target = self.cursor().map_or(0, |c| c.saturating_add(1));
        self.select_row(target)
    }

    /// Moves the cursor up by a page.
    pub fn page_up(&mut self, page_size: usize) -> Option<FetchRequest> {
        let current = self.cursor()?;
        self.select_row(current.saturating_sub(page_size))
    }

    /// Moves the cursor down by a page, clamped to the last row.
    pub fn page_down(&mut self, page_size: usize) -> Option<FetchRequest> {
        let max = self.filtered.len().checked_sub(1)?;
        let current = self.cursor().unwrap_or(0);
        self.select_row(current.saturating_add(page_size).min(max))
    }

    /// Selects `row`; returns a trailer request if the cursor moved.
    fn select_row(&mut self, row: usize) -> Option<FetchRequest> {
        let movie_id = self.filtered.get(row)?.id;
        if self.cursor() == Some(row) {
            return None;
        }
        self.table_state.select(Some(row));
        Some(self.hover(movie_id))
    }
}
