//! TMDB API response types and request parameters.

use serde::Deserialize;

/// Value of the video `type` field that marks a trailer.
pub const TRAILER_VIDEO_TYPE: &str = "Trailer";

// --- Movie lists (popular, search) ---

/// Response from the `movie/popular` and `search/movie` endpoints.
///
/// Both endpoints share the same paginated shape.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<TmdbMovie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Overview text (empty when TMDB has none for the locale).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub overview: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Poster image path, relative to the image host.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
}

impl TmdbMovie {
    /// Returns the displayable poster URL, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(super::urls::poster_url)
    }

    /// Returns the release year parsed from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

/// Treats a JSON `null` string as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Movie videos ---

/// Response from the `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideosResponse {
    /// TMDB movie ID.
    pub id: u64,
    /// Videos in the order returned by TMDB.
    pub results: Vec<TmdbVideo>,
}

impl TmdbVideosResponse {
    /// Returns the first video whose type is `"Trailer"`, in list order.
    #[must_use]
    pub fn first_trailer(&self) -> Option<&TmdbVideo> {
        self.results
            .iter()
            .find(|v| v.video_type == TRAILER_VIDEO_TYPE)
    }
}

/// A single video entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbVideo {
    /// Video site key (e.g. the YouTube video ID).
    pub key: String,
    /// Video type (e.g. "Trailer", "Teaser", "Featurette").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Video name.
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    #[serde(default)]
    pub site: String,
    /// Whether the video is marked official.
    #[serde(default)]
    pub official: bool,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for the `movie/popular` endpoint.
#[derive(Debug, Clone)]
pub struct PopularMoviesParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl Default for PopularMoviesParams {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            page: 1,
        }
    }
}

impl PopularMoviesParams {
    /// Creates new params for the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for the `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by year.
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            year: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}
