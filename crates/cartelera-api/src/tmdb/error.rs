//! Tagged TMDB request failures.

/// Reason code of a failed TMDB request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced an HTTP response.
    Network,
    /// The response body was not the expected JSON.
    Decode,
    /// TMDB answered with a non-success status.
    Server,
}

/// Error returned by TMDB API calls.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// The request URL could not be built.
    #[error("failed to build request URL for {path}: {source}")]
    Request {
        /// API path being requested.
        path: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// Transport failure (connect, TLS, timeout, body read).
    #[error("request failed: {path}: {source}")]
    Network {
        /// API path being requested.
        path: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// Non-2xx response.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// TMDB `status_code`, when the body was a TMDB error document.
        code: Option<u32>,
        /// TMDB `status_message` or the raw body.
        message: String,
    },
    /// Malformed JSON payload.
    #[error("failed to decode JSON response: {path}: {source}")]
    Decode {
        /// API path being requested.
        path: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl TmdbError {
    /// Returns the reason code of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Request { .. } | Self::Network { .. } => ErrorKind::Network,
            Self::Server { .. } => ErrorKind::Server,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }
}
