// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed favorites operations.
//!
//! Favorites live in a per-user subcollection:
//! `users/{identity_id}/favorites/{movie_id}`.

use crate::db::{collections, FavoritesStore};
use crate::error::AppError;
use crate::models::{FavoriteRecord, MovieId};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials; use an unauthenticated connection.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Store(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Store("Database not connected (offline mode)".to_string()))
    }

    /// Path of the identity's user document, parent of its favorites.
    fn user_path(&self, identity_id: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.get_client()?
            .parent_path(collections::USERS, identity_id)
            .map_err(|e| AppError::Store(e.to_string()))
    }
}

#[async_trait::async_trait]
impl FavoritesStore for FirestoreDb {
    /// Create or overwrite the favorite for `record.movie_id`.
    async fn put_favorite(
        &self,
        identity_id: &str,
        record: &FavoriteRecord,
    ) -> Result<(), AppError> {
        let parent = self.user_path(identity_id)?;
        let _: FavoriteRecord = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FAVORITES)
            .document_id(record.document_id())
            .parent(&parent)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    async fn delete_favorite(&self, identity_id: &str, movie_id: MovieId) -> Result<(), AppError> {
        let parent = self.user_path(identity_id)?;
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FAVORITES)
            .document_id(movie_id.to_string())
            .parent(&parent)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }

    async fn get_favorite(
        &self,
        identity_id: &str,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteRecord>, AppError> {
        let parent = self.user_path(identity_id)?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FAVORITES)
            .parent(&parent)
            .obj()
            .one(&movie_id.to_string())
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }

    async fn list_favorites(&self, identity_id: &str) -> Result<Vec<FavoriteRecord>, AppError> {
        let parent = self.user_path(identity_id)?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }
}
