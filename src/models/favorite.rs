// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite movie record stored per identity.

use crate::models::movie::{MovieId, MovieSummary, RatingTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Denormalized snapshot of a movie taken when it was favorited.
///
/// Stored at `users/{identity_id}/favorites/{movie_id}`, so a second add for
/// the same movie overwrites the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Catalog movie ID (also used as document ID)
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<String>,
    /// When the movie was favorited
    #[serde(rename = "addedAt", with = "firestore::serialize_as_timestamp")]
    pub added_at: DateTime<Utc>,
}

impl FavoriteRecord {
    /// Snapshot the summary fields of `movie` at `added_at`.
    pub fn snapshot(movie: &MovieSummary, added_at: DateTime<Utc>) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
            release_date: movie.release_date.clone(),
            added_at,
        }
    }

    /// Document ID within the identity's favorites collection.
    pub fn document_id(&self) -> String {
        self.movie_id.to_string()
    }

    pub fn poster_url(&self) -> String {
        crate::models::movie::poster_url(self.poster_path.as_deref())
    }

    pub fn rating_tier(&self) -> RatingTier {
        RatingTier::from_vote(self.vote_average)
    }
}
