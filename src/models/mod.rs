// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod favorite;
pub mod identity;
pub mod movie;

pub use favorite::FavoriteRecord;
pub use identity::Identity;
pub use movie::{
    find_trailer, Genre, GenreId, MovieDetail, MovieId, MoviePage, MovieSummary, RatingTier,
    Video, MAX_TOTAL_PAGES,
};
