//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::error::TmdbError;
use super::types::{
    PopularMoviesParams, SearchMovieParams, TmdbErrorResponse, TmdbMovieListResponse,
    TmdbVideosResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// How requests are authenticated.
#[derive(Debug, Clone)]
enum Credential {
    /// v3 API key sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token sent as a Bearer header.
    BearerToken(String),
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request credential.
    credential: Credential,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credential: Option<Credential>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credential: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key, sent as a query-string parameter.
    ///
    /// Replaces a previously set bearer token.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credential = Some(Credential::ApiKey(key.into()));
        self
    }

    /// Sets the v4 bearer token, sent in the `Authorization` header.
    ///
    /// Replaces a previously set API key.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::BearerToken(token.into()));
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - neither `api_key` nor `api_token` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credential = self
            .credential
            .context("api_key or api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credential,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a single GET request with credential and query params.
    ///
    /// Every failure is mapped onto a tagged `TmdbError`; nothing is retried.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let url = self.base_url.join(path).map_err(|source| TmdbError::Request {
            path: String::from(path),
            source,
        })?;

        let builder = self.http_client.get(url).query(query);
        let builder = match &self.credential {
            Credential::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
            Credential::BearerToken(token) => builder.bearer_auth(token),
        };
        let request = builder.build().map_err(|source| TmdbError::Network {
            path: String::from(path),
            source: source.without_url(),
        })?;

        // The full URL carries the API key; log the path only and strip the
        // URL from transport errors.
        tracing::debug!(path, "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.map_err(|source| TmdbError::Network {
            path: String::from(path),
            source: source.without_url(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            tracing::debug!(status = status.as_u16(), "TMDB API error response");
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                return Err(TmdbError::Server {
                    status: status.as_u16(),
                    code: Some(error_response.status_code),
                    message: error_response.status_message,
                });
            }
            return Err(TmdbError::Server {
                status: status.as_u16(),
                code: None,
                message: body,
            });
        }

        let body = response.text().await.map_err(|source| TmdbError::Network {
            path: String::from(path),
            source: source.without_url(),
        })?;
        serde_json::from_str(&body).map_err(|source| TmdbError::Decode {
            path: String::from(path),
            source,
        })
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn popular_movies(
        &self,
        params: &PopularMoviesParams,
    ) -> Result<TmdbMovieListResponse, TmdbError> {
        let mut query: Vec<(&str, String)> = vec![
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
        ];

        self.get_json("movie/popular", &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_videos(
        &self,
        movie_id: u64,
        language: &str,
    ) -> Result<TmdbVideosResponse, TmdbError> {
        let path = format!("movie/{movie_id}/videos");
        let query = [("language", String::from(language))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn search_movie(
        &self,
        params: &SearchMovieParams,
    ) -> Result<TmdbMovieListResponse, TmdbError> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.year {
            query.push(("year", year.to_string()));
        }

        self.get_json("search/movie", &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::tmdb::ErrorKind;

    const POPULAR_JSON: &str = include_str!("../../../../fixtures/tmdb/movie_popular.json");
    const SEARCH_JSON: &str = include_str!("../../../../fixtures/tmdb/search_movie_matrix.json");
    const VIDEOS_JSON: &str = include_str!("../../../../fixtures/tmdb/movie_videos_603.json");

    fn client_for(mock_server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credential() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key or api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_to_tmdb_v3() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_parse_popular_fixture() {
        // Arrange & Act
        let response: TmdbMovieListResponse = serde_json::from_str(POPULAR_JSON).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.results.len(), 20);
        assert_eq!(response.results[0].id, 912_649);
        assert!(response.total_pages > 1);
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange & Act
        let response: TmdbMovieListResponse = serde_json::from_str(SEARCH_JSON).unwrap();

        // Assert
        assert!(!response.results.is_empty());
        assert_eq!(response.results[0].id, 603);
        assert!(response.results.iter().all(|m| m.title.contains("Matrix")));
    }

    #[test]
    fn test_parse_videos_fixture() {
        // Arrange & Act
        let response: TmdbVideosResponse = serde_json::from_str(VIDEOS_JSON).unwrap();

        // Assert
        assert_eq!(response.id, 603);
        assert_eq!(response.results[0].video_type, "Teaser");
        assert_eq!(response.first_trailer().unwrap().key, "vKQi3bBA1y8");
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_popular_movies_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/popular"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .and(wiremock::matchers::query_param("language", "es-ES"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(POPULAR_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let params = PopularMoviesParams::new().language("es-ES");

        // Act
        let response = client.popular_movies(&params).await.unwrap();

        // Assert
        assert_eq!(response.results.len(), 20);
    }

    #[tokio::test]
    async fn test_movie_videos_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/603/videos"))
            .and(wiremock::matchers::query_param("language", "es-ES"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(VIDEOS_JSON))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let response = client.movie_videos(603, "es-ES").await.unwrap();

        // Assert
        assert_eq!(response.id, 603);
        assert!(!response.results.is_empty());
    }

    #[tokio::test]
    async fn test_search_movie_escapes_query() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        // query_param compares the decoded value, so a match proves the
        // space and ampersand survived the round trip.
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "Matrix & Co"))
            .and(wiremock::matchers::query_param("include_adult", "false"))
            .and(wiremock::matchers::query_param("year", "1999"))
            .and(wiremock::matchers::query_param_is_missing("primary_release_year"))
            .and(wiremock::matchers::query_param_is_missing("region"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(SEARCH_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let params = SearchMovieParams::new("Matrix & Co")
            .language("es-ES")
            .year(1999);

        // Act
        let response = client.search_movie(&params).await.unwrap();

        // Assert
        assert_eq!(response.results[0].id, 603);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(POPULAR_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("my-secret-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies Authorization header)
        client
            .popular_movies(&PopularMoviesParams::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_server_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client.movie_videos(603, "es-ES").await.unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(matches!(
            err,
            TmdbError::Server {
                status: 401,
                code: Some(7),
                ..
            }
        ));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_without_tmdb_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client
            .popular_movies(&PopularMoviesParams::new())
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(
            err,
            TmdbError::Server {
                status: 502,
                code: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client
            .search_movie(&SearchMovieParams::new("Matrix"))
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_decode_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{\"page\":"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let err = client
            .popular_movies(&PopularMoviesParams::new())
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_connection_refused_returns_network_error() {
        // Arrange
        let client = TmdbClient::builder()
            .base_url(Url::parse("http://127.0.0.1:1/3/").unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let err = client.movie_videos(603, "es-ES").await.unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_api_key() {
        // Arrange
        let client = TmdbClient::builder()
            .base_url(Url::parse("http://127.0.0.1:1/3/").unwrap())
            .api_key("SECRET-KEY-123")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let err = client.movie_videos(603, "es-ES").await.unwrap_err();

        // Assert
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        assert!(message.contains("movie/603/videos"));
        assert!(!message.contains("SECRET-KEY-123"));
    }
}
