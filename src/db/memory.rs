// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process favorites store for local runs without Firestore.

use crate::db::FavoritesStore;
use crate::error::Result;
use crate::models::{FavoriteRecord, MovieId};
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Favorites kept in memory, one map per identity.
#[derive(Default)]
pub struct MemoryFavoritesStore {
    favorites: DashMap<String, BTreeMap<MovieId, FavoriteRecord>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn put_favorite(&self, identity_id: &str, record: &FavoriteRecord) -> Result<()> {
        self.favorites
            .entry(identity_id.to_string())
            .or_default()
            .insert(record.movie_id, record.clone());
        Ok(())
    }

    async fn delete_favorite(&self, identity_id: &str, movie_id: MovieId) -> Result<()> {
        if let Some(mut records) = self.favorites.get_mut(identity_id) {
            records.remove(&movie_id);
        }
        Ok(())
    }

    async fn get_favorite(
        &self,
        identity_id: &str,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteRecord>> {
        Ok(self
            .favorites
            .get(identity_id)
            .and_then(|records| records.get(&movie_id).cloned()))
    }

    async fn list_favorites(&self, identity_id: &str) -> Result<Vec<FavoriteRecord>> {
        Ok(self
            .favorites
            .get(identity_id)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }
}
