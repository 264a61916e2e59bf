//! Runs fetch requests against the TMDB API.
//!
//! Every request is spawned as its own task and reports back exactly one
//! [`FetchOutcome`] over an unbounded channel. Nothing is cancelled: a
//! superseded request still completes and its outcome is discarded by
//! [`BrowserState::apply`](crate::state::BrowserState::apply).

use std::sync::Arc;

use cartelera_api::tmdb::{PopularMoviesParams, SearchMovieParams, TmdbApi};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::instrument;

use crate::state::{FetchOutcome, FetchRequest};

/// Spawns fetch tasks and forwards their outcomes.
#[derive(Debug)]
pub struct Dispatcher<C> {
    /// Shared API client.
    client: Arc<C>,
    /// Response language for every request (e.g. "es-ES").
    language: String,
    /// Outcome channel back to the view.
    outcomes: UnboundedSender<FetchOutcome>,
}

impl<C> Dispatcher<C>
where
    C: TmdbApi + Sync + 'static,
{
    /// Creates a dispatcher and the receiver its outcomes arrive on.
    pub fn new(
        client: Arc<C>,
        language: impl Into<String>,
    ) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let dispatcher = Self {
            client,
            language: language.into(),
            outcomes,
        };
        (dispatcher, receiver)
    }

    /// Response language used for requests.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Spawns `request` on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, request: FetchRequest) {
        let client = Arc::clone(&self.client);
        let language = self.language.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = run_request(client.as_ref(), &language, request).await;
            if outcomes.send(outcome).is_err() {
                tracing::debug!("browser closed; dropping fetch outcome");
            }
        });
    }
}

/// Runs a single request to completion.
///
/// The trailer flow picks the first video whose type is `"Trailer"`.
#[instrument(skip(client))]
pub async fn run_request<C>(client: &C, language: &str, request: FetchRequest) -> FetchOutcome
where
    C: TmdbApi + Sync,
{
    match request {
        FetchRequest::Catalog { ticket } => {
            let params = PopularMoviesParams::new().language(language);
            let result = client
                .popular_movies(&params)
                .await
                .map(|response| response.results)
                .map_err(Into::into);
            FetchOutcome::Catalog { ticket, result }
        }
        FetchRequest::Trailer { ticket, movie_id } => {
            let result = client
                .movie_videos(movie_id, language)
                .await
                .map(|response| response.first_trailer().map(|video| video.key.clone()))
                .map_err(Into::into);
            FetchOutcome::Trailer {
                ticket,
                movie_id,
                result,
            }
        }
        FetchRequest::Search { ticket, query } => {
            let params = SearchMovieParams::new(query).language(language);
            let result = client
                .search_movie(&params)
                .await
                .map(|response| response.results)
                .map_err(Into::into);
            FetchOutcome::Search { ticket, result }
        }
    }
}
