// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::time::Duration;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_TMDB_LANGUAGE: &str = "tr-TR";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 1000;

/// Where favorite records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesBackend {
    /// Firestore (or the Firestore emulator).
    Firestore,
    /// Process-local map, lost on exit.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Movie catalog ---
    /// TMDB API key, sent as a query parameter on every call
    pub tmdb_api_key: String,
    /// TMDB REST base URL
    pub tmdb_base_url: String,
    /// Language for genre and detail lookups
    pub tmdb_language: String,

    // --- Identity provider ---
    /// Firebase web API key
    pub firebase_api_key: String,
    /// Auth emulator host (host:port), if running locally
    pub firebase_auth_emulator_host: Option<String>,

    // --- Favorites store ---
    /// GCP project ID
    pub gcp_project_id: String,
    pub favorites_backend: FavoritesBackend,

    /// Quiet period before typed search text is committed
    pub search_debounce: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            tmdb_api_key: "test_tmdb_key".to_string(),
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            tmdb_language: DEFAULT_TMDB_LANGUAGE.to_string(),
            firebase_api_key: "test_firebase_key".to_string(),
            firebase_auth_emulator_host: None,
            gcp_project_id: "test-project".to_string(),
            favorites_backend: FavoritesBackend::Memory,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let favorites_backend = match env::var("FAVORITES_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => FavoritesBackend::Firestore,
            "memory" => FavoritesBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "FAVORITES_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let search_debounce_ms = match env::var("SEARCH_DEBOUNCE_MS") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SEARCH_DEBOUNCE_MS",
                value: raw,
            })?,
            Err(_) => DEFAULT_SEARCH_DEBOUNCE_MS,
        };

        Ok(Self {
            tmdb_api_key: env::var("TMDB_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("TMDB_API_KEY"))?,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            tmdb_language: env::var("TMDB_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_TMDB_LANGUAGE.to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            firebase_auth_emulator_host: env::var("FIREBASE_AUTH_EMULATOR_HOST").ok(),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            favorites_backend,
            search_debounce: Duration::from_millis(search_debounce_ms),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("TMDB_API_KEY", " test_tmdb ");
        env::set_var("FIREBASE_API_KEY", "test_firebase");
        env::set_var("FAVORITES_BACKEND", "Memory");
        env::set_var("SEARCH_DEBOUNCE_MS", "250");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.tmdb_api_key, "test_tmdb");
        assert_eq!(config.firebase_api_key, "test_firebase");
        assert_eq!(config.favorites_backend, FavoritesBackend::Memory);
        assert_eq!(config.search_debounce, Duration::from_millis(250));

        env::remove_var("FAVORITES_BACKEND");
        env::remove_var("SEARCH_DEBOUNCE_MS");
    }

    #[test]
    fn test_default_debounce_is_one_second() {
        assert_eq!(Config::default().search_debounce, Duration::from_secs(1));
    }
}
