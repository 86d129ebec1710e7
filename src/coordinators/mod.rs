// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View-state coordinators - one per view, each owning its state.

pub mod account;
pub mod browse;
pub mod debounce;
pub mod detail;
pub mod favorites;

pub use account::{AccountCoordinator, SignUpForm};
pub use browse::{BrowseCoordinator, BrowseQuery, BrowseState};
pub use debounce::{Debounced, Debouncer};
pub use detail::{DetailCoordinator, DetailState, ToggleOutcome};
pub use favorites::{FavoritesListCoordinator, FavoritesListState};
