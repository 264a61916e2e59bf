//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::TmdbError;
use super::types::{
    PopularMoviesParams, SearchMovieParams, TmdbMovieListResponse, TmdbVideosResponse,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// Implement `TmdbApi` so the blanket impl provides `LocalTmdbApi` too.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the list of popular movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, TMDB answers with a
    /// non-success status, or the JSON cannot be decoded.
    async fn popular_movies(
        &self,
        params: &PopularMoviesParams,
    ) -> Result<TmdbMovieListResponse, TmdbError>;

    /// Fetches the videos attached to a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, TMDB answers with a
    /// non-success status, or the JSON cannot be decoded.
    async fn movie_videos(
        &self,
        movie_id: u64,
        language: &str,
    ) -> Result<TmdbVideosResponse, TmdbError>;

    /// Searches for movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, TMDB answers with a
    /// non-success status, or the JSON cannot be decoded.
    async fn search_movie(
        &self,
        params: &SearchMovieParams,
    ) -> Result<TmdbMovieListResponse, TmdbError>;
}
