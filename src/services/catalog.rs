// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie catalog client (TMDB REST API).
//!
//! Handles:
//! - Genre listing
//! - Keyword search and filtered discovery (paginated)
//! - Movie detail and video lookups
//!
//! Every request carries the API key as a query parameter.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Genre, GenreId, MovieDetail, MovieId, MoviePage, Video};
use serde::Deserialize;
use std::sync::Arc;

/// Read-only access to the movie catalog.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// All movie genres. An absent `genres` field yields an empty list.
    async fn list_genres(&self) -> Result<Vec<Genre>>;

    /// Keyword search. `query` must be non-empty; `page` starts at 1.
    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage>;

    /// Popular movies, optionally restricted to one genre.
    async fn discover_movies(&self, page: u32, genre_id: Option<GenreId>) -> Result<MoviePage>;

    /// Movie detail, or `None` when the catalog has no such movie.
    async fn get_movie_detail(&self, movie_id: MovieId) -> Result<Option<MovieDetail>>;

    /// Videos attached to a movie, in catalog order.
    async fn get_movie_videos(&self, movie_id: MovieId) -> Result<Vec<Video>>;
}

/// Type alias for any catalog backend.
pub type CatalogPtr = Arc<dyn CatalogApi>;

/// TMDB API client.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "TMDB API key cannot be empty"
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
            language: language.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.tmdb_base_url.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_language.clone(),
        )
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("TMDB request to {} failed: {}", path, e)))?;

        self.check_response_json(path, response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(AppError::NotFound(format!("TMDB resource {}", path)));
            }

            if status.as_u16() == 401 {
                tracing::error!(path, "TMDB rejected the API key");
                return Err(AppError::Network(
                    "TMDB API key is invalid or missing".to_string(),
                ));
            }

            if status.as_u16() == 429 {
                tracing::warn!(path, "TMDB rate limit hit (429)");
            }

            return Err(AppError::Network(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("JSON parse error from {}: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl CatalogApi for TmdbClient {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let response: GenresResponse = self
            .get_json("/genre/movie/list", &[("language", self.language.clone())])
            .await?;
        Ok(response.genres)
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "search query must not be empty"
            )));
        }

        tracing::debug!(query = %query, page, "Searching TMDB movies");
        self.get_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn discover_movies(&self, page: u32, genre_id: Option<GenreId>) -> Result<MoviePage> {
        tracing::debug!(page, genre_id = ?genre_id, "Discovering TMDB movies");

        let mut params = vec![("page", page.to_string())];
        if let Some(genre_id) = genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }

        self.get_json("/discover/movie", &params).await
    }

    async fn get_movie_detail(&self, movie_id: MovieId) -> Result<Option<MovieDetail>> {
        tracing::debug!(movie_id, "Fetching TMDB movie details");

        let payload = self
            .get_json::<DetailPayload>(
                &format!("/movie/{}", movie_id),
                &[("language", self.language.clone())],
            )
            .await;

        match payload {
            Ok(payload) => payload.into_detail(movie_id),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_movie_videos(&self, movie_id: MovieId) -> Result<Vec<Video>> {
        let response: VideosResponse = self
            .get_json(&format!("/movie/{}/videos", movie_id), &[])
            .await?;
        Ok(response.results)
    }
}

/// Genre list response.
#[derive(Debug, Deserialize)]
struct GenresResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Video list response.
#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

/// Status envelope TMDB returns in place of a resource.
#[derive(Debug, Deserialize)]
struct ApiStatus {
    success: bool,
    #[serde(default)]
    status_message: Option<String>,
}

/// Detail endpoint body: either the movie or a status envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailPayload {
    Status(ApiStatus),
    Movie(Box<MovieDetail>),
}

impl DetailPayload {
    /// A `success: false` envelope is an explicit "not found", not a parse error.
    fn into_detail(self, movie_id: MovieId) -> Result<Option<MovieDetail>> {
        match self {
            DetailPayload::Movie(detail) => Ok(Some(*detail)),
            DetailPayload::Status(status) if !status.success => {
                tracing::debug!(
                    movie_id,
                    message = status.status_message.as_deref().unwrap_or_default(),
                    "TMDB reported movie not found"
                );
                Ok(None)
            }
            DetailPayload::Status(_) => Err(AppError::Network(format!(
                "TMDB returned a status envelope without movie {}",
                movie_id
            ))),
        }
    }
}
