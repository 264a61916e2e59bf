//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! and retrieves popular movies, movie videos and search results.

mod api;
mod client;
mod error;
mod types;
mod urls;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{ErrorKind, TmdbError};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    PopularMoviesParams, SearchMovieParams, TmdbErrorResponse, TmdbMovie,
    TmdbMovieListResponse, TmdbVideo, TmdbVideosResponse, TRAILER_VIDEO_TYPE,
};
pub use urls::{IMAGE_BASE_URL, poster_url, trailer_embed_url, trailer_watch_url};
