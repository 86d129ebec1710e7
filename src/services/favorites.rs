// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites adapter used by the coordinators.
//!
//! Store failures never reach the caller: writes report `false`, reads report
//! "absent" or an empty list. Every swallowed failure is logged at error level.

use crate::db::FavoritesStorePtr;
use crate::models::{FavoriteRecord, MovieId, MovieSummary};

#[derive(Clone)]
pub struct FavoritesService {
    store: FavoritesStorePtr,
}

impl FavoritesService {
    pub fn new(store: FavoritesStorePtr) -> Self {
        Self { store }
    }

    /// Snapshot `movie` into the identity's favorites, overwriting any
    /// previous record for the same movie.
    pub async fn add(&self, identity_id: &str, movie: &MovieSummary) -> bool {
        let record = FavoriteRecord::snapshot(movie, chrono::Utc::now());
        match self.store.put_favorite(identity_id, &record).await {
            Ok(()) => {
                tracing::info!(identity_id, movie_id = movie.id, "Favorite added");
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    identity_id,
                    movie_id = movie.id,
                    "Failed to add favorite"
                );
                false
            }
        }
    }

    /// Remove a favorite. Removing an absent record succeeds.
    pub async fn remove(&self, identity_id: &str, movie_id: MovieId) -> bool {
        match self.store.delete_favorite(identity_id, movie_id).await {
            Ok(()) => {
                tracing::info!(identity_id, movie_id, "Favorite removed");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, identity_id, movie_id, "Failed to remove favorite");
                false
            }
        }
    }

    /// Whether the movie is a favorite. A failed lookup reads as `false`.
    pub async fn exists(&self, identity_id: &str, movie_id: MovieId) -> bool {
        match self.store.get_favorite(identity_id, movie_id).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                tracing::error!(error = %e, identity_id, movie_id, "Favorite check failed");
                false
            }
        }
    }

    /// All favorites of the identity. A failed scan reads as empty.
    pub async fn list_all(&self, identity_id: &str) -> Vec<FavoriteRecord> {
        match self.store.list_favorites(identity_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, identity_id, "Failed to list favorites");
                Vec::new()
            }
        }
    }
}
