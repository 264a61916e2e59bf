//! API client library for cartelera.
//!
//! Provides a client for the TMDB API v3 movie endpoints used by the
//! movie browser: popular movies, movie videos and movie search.

/// TMDB API client.
pub mod tmdb;
