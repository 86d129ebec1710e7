// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie catalog models (TMDB response shapes).

use serde::{Deserialize, Serialize};

/// Catalog-assigned numeric movie ID.
pub type MovieId = u64;

/// Catalog-assigned numeric genre ID.
pub type GenreId = u64;

/// Deepest page the catalog will serve for search and discover.
pub const MAX_TOTAL_PAGES: u32 = 700;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";
const OVERVIEW_FALLBACK: &str = "No overview available.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Movie as it appears in search and discover listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    /// Release date (YYYY-MM-DD); empty or absent for unreleased titles
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSummary {
    pub fn poster_url(&self) -> String {
        poster_url(self.poster_path.as_deref())
    }

    pub fn rating_tier(&self) -> RatingTier {
        RatingTier::from_vote(self.vote_average)
    }
}

/// One page of search or discover results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    /// Raw page count reported by the catalog
    #[serde(default)]
    pub total_pages: u32,
}

impl MoviePage {
    /// Page count usable for pagination: at least 1, at most [`MAX_TOTAL_PAGES`].
    pub fn capped_total_pages(&self) -> u32 {
        self.total_pages.clamp(1, MAX_TOTAL_PAGES)
    }
}

/// Full movie record for the detail view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl MovieDetail {
    /// Summary fields, as snapshotted into a favorite record.
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average,
            release_date: self.release_date.clone(),
        }
    }

    pub fn overview_text(&self) -> &str {
        self.overview
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(OVERVIEW_FALLBACK)
    }

    /// Four-digit release year, if the date is known.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
    }

    pub fn poster_url(&self) -> String {
        poster_url(self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| format!("{}/{}{}", IMAGE_BASE_URL, BACKDROP_SIZE, path))
    }
}

/// Video attached to a movie (trailers, teasers, clips).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.key)
    }
}

/// First YouTube trailer in catalog order, if any.
pub fn find_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| v.is_youtube_trailer())
}

/// Poster URL, or the placeholder image when the catalog has none.
pub fn poster_url(path: Option<&str>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}/{}{}", IMAGE_BASE_URL, POSTER_SIZE, path),
        _ => PLACEHOLDER_POSTER_URL.to_string(),
    }
}

/// Coarse rating bucket used for badge coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    High,
    Medium,
    Low,
}

impl RatingTier {
    pub fn from_vote(vote: f64) -> Self {
        if vote >= 7.0 {
            RatingTier::High
        } else if vote >= 5.0 {
            RatingTier::Medium
        } else {
            RatingTier::Low
        }
    }
}
