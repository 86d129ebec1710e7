// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for the catalog, favorites store and identity provider.

pub mod catalog;
pub mod favorites;
pub mod identity;
pub mod session;

pub use catalog::{CatalogApi, CatalogPtr, TmdbClient};
pub use favorites::FavoritesService;
pub use identity::{FirebaseAuth, IdentityProvider};
pub use session::{IdentitySession, SessionHandle, SessionState};
