// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: per-identity favorite records.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryFavoritesStore;

use crate::error::Result;
use crate::models::{FavoriteRecord, MovieId};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Subcollection under `users/{identity_id}`, keyed by movie ID
    pub const FAVORITES: &str = "favorites";
}

/// Persistence for favorite records, scoped by identity ID.
///
/// Writes are upserts keyed by movie ID; deleting an absent record succeeds.
#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn put_favorite(&self, identity_id: &str, record: &FavoriteRecord) -> Result<()>;

    async fn delete_favorite(&self, identity_id: &str, movie_id: MovieId) -> Result<()>;

    async fn get_favorite(
        &self,
        identity_id: &str,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteRecord>>;

    async fn list_favorites(&self, identity_id: &str) -> Result<Vec<FavoriteRecord>>;
}

/// Type alias for any backend that implements FavoritesStore.
pub type FavoritesStorePtr = Arc<dyn FavoritesStore>;
