// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single movie view: detail, trailer and the favorite toggle.

use crate::models::{find_trailer, MovieDetail, MovieId, Video};
use crate::notice::Notifier;
use crate::services::{CatalogPtr, FavoritesService, SessionHandle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub movie_id: MovieId,
    pub loading: bool,
    pub detail: Option<MovieDetail>,
    /// First YouTube trailer, if the movie has one
    pub trailer: Option<Video>,
    pub not_found: bool,
    pub is_favorite: bool,
    /// Toggle control is disabled while set
    pub toggle_in_flight: bool,
}

impl DetailState {
    fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            loading: true,
            detail: None,
            trailer: None,
            not_found: false,
            is_favorite: false,
            toggle_in_flight: false,
        }
    }
}

/// Result of [`DetailCoordinator::toggle_favorite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Store reported failure; favorite state unchanged
    Failed,
    /// Another toggle is still in flight
    Busy,
    /// No identity or no loaded movie
    Unavailable,
}

pub struct DetailCoordinator {
    catalog: CatalogPtr,
    favorites: FavoritesService,
    session: SessionHandle,
    notifier: Notifier,
    state: watch::Sender<DetailState>,
    toggling: AtomicBool,
    /// Bumped whenever a toggle starts; a favorite lookup begun under an
    /// older value must not overwrite the toggle's result.
    toggles: AtomicU64,
}

impl DetailCoordinator {
    pub fn new(
        movie_id: MovieId,
        catalog: CatalogPtr,
        favorites: FavoritesService,
        session: SessionHandle,
        notifier: Notifier,
    ) -> Self {
        let (state, _) = watch::channel(DetailState::new(movie_id));
        Self {
            catalog,
            favorites,
            session,
            notifier,
            state,
            toggling: AtomicBool::new(false),
            toggles: AtomicU64::new(0),
        }
    }

    pub fn movie_id(&self) -> MovieId {
        self.state.borrow().movie_id
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Fetch detail and videos concurrently and, when signed in, seed the
    /// favorite toggle.
    pub async fn load(&self) {
        tokio::join!(self.load_movie(), self.load_favorite_state());
    }

    async fn load_movie(&self) {
        let movie_id = self.movie_id();
        let (detail, videos) = tokio::join!(
            self.catalog.get_movie_detail(movie_id),
            self.catalog.get_movie_videos(movie_id)
        );

        let detail = match detail {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                tracing::info!(movie_id, "Movie not found");
                self.notifier.error("Movie not found!");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.not_found = true;
                });
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Failed to load movie detail");
                self.notifier.error("Movie could not be loaded!");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.not_found = true;
                });
                return;
            }
        };

        let trailer = match videos {
            Ok(videos) => find_trailer(&videos).cloned(),
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Failed to load movie videos");
                None
            }
        };

        self.state.send_modify(|s| {
            s.loading = false;
            s.detail = Some(detail);
            s.trailer = trailer;
        });
    }

    async fn load_favorite_state(&self) {
        let Some(identity) = self.session.current() else {
            return;
        };
        let movie_id = self.movie_id();
        let seen = self.toggles.load(Ordering::Acquire);
        let is_favorite = self.favorites.exists(&identity.id, movie_id).await;

        self.state.send_if_modified(|s| {
            if self.toggles.load(Ordering::Acquire) != seen {
                tracing::debug!(movie_id, "Discarding favorite lookup overtaken by a toggle");
                return false;
            }
            let changed = s.is_favorite != is_favorite;
            s.is_favorite = is_favorite;
            changed
        });
    }

    /// Add or remove the movie from the signed-in identity's favorites.
    ///
    /// At most one toggle runs at a time; a call made while one is in flight
    /// returns [`ToggleOutcome::Busy`] without touching the store.
    pub async fn toggle_favorite(&self) -> ToggleOutcome {
        if self
            .toggling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(movie_id = self.movie_id(), "Toggle already in flight");
            return ToggleOutcome::Busy;
        }
        let _in_flight = InFlight::start(&self.toggling, &self.state);

        // Read under the flag so no other toggle can change it meanwhile.
        let Some(identity) = self.session.current() else {
            return ToggleOutcome::Unavailable;
        };
        let (summary, was_favorite) = {
            let state = self.state.borrow();
            match &state.detail {
                Some(detail) => (detail.summary(), state.is_favorite),
                None => return ToggleOutcome::Unavailable,
            }
        };
        self.toggles.fetch_add(1, Ordering::AcqRel);

        let ok = if was_favorite {
            self.favorites.remove(&identity.id, summary.id).await
        } else {
            self.favorites.add(&identity.id, &summary).await
        };

        if !ok {
            self.notifier.error("Operation failed!");
            return ToggleOutcome::Failed;
        }

        self.state.send_modify(|s| s.is_favorite = !was_favorite);
        if was_favorite {
            self.notifier.info("Removed from favorites");
            ToggleOutcome::Removed
        } else {
            self.notifier.success("Added to favorites!");
            ToggleOutcome::Added
        }
    }
}

/// Marks a toggle in flight; clears the flag when dropped.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<DetailState>,
}

impl<'a> InFlight<'a> {
    fn start(flag: &'a AtomicBool, state: &'a watch::Sender<DetailState>) -> Self {
        state.send_modify(|s| s.toggle_in_flight = true);
        Self { flag, state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.toggle_in_flight = false);
        self.flag.store(false, Ordering::Release);
    }
}
