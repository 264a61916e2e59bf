//! Image and trailer URL construction.

/// Image host prefix for poster paths (500px wide).
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Embedded player URL prefix for trailer keys.
const TRAILER_EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

/// Watch page URL prefix for trailer keys.
const TRAILER_WATCH_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Builds a poster URL from a relative poster path (e.g. `"/abc.jpg"`).
#[must_use]
pub fn poster_url(poster_path: &str) -> String {
    format!("{IMAGE_BASE_URL}{poster_path}")
}

/// Builds the embedded player URL for a trailer key.
#[must_use]
pub fn trailer_embed_url(key: &str) -> String {
    format!("{TRAILER_EMBED_BASE_URL}{key}")
}

/// Builds the watch page URL for a trailer key.
#[must_use]
pub fn trailer_watch_url(key: &str) -> String {
    format!("{TRAILER_WATCH_BASE_URL}{key}")
}
