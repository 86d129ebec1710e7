// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Movie-Shelf: browse a movie catalog and keep a personal favorites list
//!
//! This crate wires a TMDB catalog client, a Firebase identity session and a
//! Firestore favorites store into per-view coordinators.

pub mod config;
pub mod coordinators;
pub mod db;
pub mod error;
pub mod guard;
pub mod models;
pub mod notice;
pub mod services;

use config::Config;
use coordinators::{
    AccountCoordinator, BrowseCoordinator, DetailCoordinator, FavoritesListCoordinator,
};
use models::MovieId;
use notice::Notifier;
use services::{CatalogPtr, FavoritesService, IdentityProvider, SessionHandle};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogPtr,
    pub favorites: FavoritesService,
    pub identity: Arc<dyn IdentityProvider>,
    pub session: SessionHandle,
    pub notifier: Notifier,
}

impl AppState {
    /// Activate the browse view.
    pub fn browse(&self) -> BrowseCoordinator {
        BrowseCoordinator::spawn(
            self.catalog.clone(),
            self.notifier.clone(),
            self.config.search_debounce,
        )
    }

    pub fn detail(&self, movie_id: MovieId) -> DetailCoordinator {
        DetailCoordinator::new(
            movie_id,
            self.catalog.clone(),
            self.favorites.clone(),
            self.session.clone(),
            self.notifier.clone(),
        )
    }

    pub fn favorites_list(&self) -> FavoritesListCoordinator {
        FavoritesListCoordinator::new(
            self.favorites.clone(),
            self.session.clone(),
            self.notifier.clone(),
        )
    }

    pub fn account(&self) -> AccountCoordinator {
        AccountCoordinator::new(self.identity.clone(), self.notifier.clone())
    }
}
