// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites list view of the signed-in identity.

use crate::models::{FavoriteRecord, MovieId};
use crate::notice::Notifier;
use crate::services::{FavoritesService, SessionHandle};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesListState {
    pub loading: bool,
    pub favorites: Vec<FavoriteRecord>,
}

impl Default for FavoritesListState {
    fn default() -> Self {
        Self {
            loading: true,
            favorites: Vec::new(),
        }
    }
}

pub struct FavoritesListCoordinator {
    favorites: FavoritesService,
    session: SessionHandle,
    notifier: Notifier,
    state: watch::Sender<FavoritesListState>,
}

impl FavoritesListCoordinator {
    pub fn new(favorites: FavoritesService, session: SessionHandle, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(FavoritesListState::default());
        Self {
            favorites,
            session,
            notifier,
            state,
        }
    }

    pub fn state(&self) -> FavoritesListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoritesListState> {
        self.state.subscribe()
    }

    /// Load all favorites; signed out means an empty list at once.
    pub async fn load(&self) {
        let favorites = match self.session.current() {
            Some(identity) => self.favorites.list_all(&identity.id).await,
            None => Vec::new(),
        };
        tracing::debug!(count = favorites.len(), "Favorites loaded");

        self.state.send_replace(FavoritesListState {
            loading: false,
            favorites,
        });
    }

    /// Remove a favorite. The entry leaves the list whether or not the store
    /// delete succeeds; a failed delete raises an error notice.
    pub async fn remove_one(&self, movie_id: MovieId) {
        let Some(identity) = self.session.current() else {
            return;
        };

        if !self.favorites.remove(&identity.id, movie_id).await {
            self.notifier.error("Could not remove from favorites!");
        }
        self.state
            .send_modify(|s| s.favorites.retain(|f| f.movie_id != movie_id));
    }
}
