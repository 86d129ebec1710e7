// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fakes shared by the integration tests.

use movie_shelf::db::{FavoritesStore, FirestoreDb, MemoryFavoritesStore};
use movie_shelf::error::{AppError, AuthErrorCode, Result};
use movie_shelf::models::{
    FavoriteRecord, Genre, GenreId, Identity, MovieDetail, MovieId, MoviePage, MovieSummary, Video,
};
use movie_shelf::notice::Notice;
use movie_shelf::services::{CatalogApi, IdentityProvider, SessionState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn movie(id: MovieId, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        vote_average: 7.5,
        release_date: Some("2008-07-16".to_string()),
    }
}

#[allow(dead_code)]
pub fn detail(id: MovieId, title: &str) -> MovieDetail {
    MovieDetail {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        vote_average: 8.4,
        release_date: Some("2008-07-16".to_string()),
        tagline: Some("Why so serious?".to_string()),
        overview: Some("Batman raises the stakes.".to_string()),
        runtime: Some(152),
        backdrop_path: Some(format!("/backdrop-{}.jpg", id)),
        genres: vec![Genre {
            id: 28,
            name: "Action".to_string(),
        }],
    }
}

#[allow(dead_code)]
pub fn video(key: &str, site: &str, kind: &str) -> Video {
    Video {
        key: key.to_string(),
        site: site.to_string(),
        kind: kind.to_string(),
    }
}

/// Drain every notice raised so far.
#[allow(dead_code)]
pub fn drain_notices(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

// ═══════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    Genres,
    Search { query: String, page: u32 },
    Discover { page: u32, genre_id: Option<GenreId> },
    Detail(MovieId),
    Videos(MovieId),
}

/// Catalog that records every call.
///
/// Search results carry a single movie titled after the query; discover
/// results one titled `discover:{page}:{genre}`.
pub struct FakeCatalog {
    calls: Mutex<Vec<CatalogCall>>,
    total_pages: AtomicU32,
    search_delays: Mutex<HashMap<String, Duration>>,
    fail_movies: AtomicBool,
    fail_genres: AtomicBool,
    fail_detail: AtomicBool,
    details: Mutex<HashMap<MovieId, MovieDetail>>,
    videos: Mutex<HashMap<MovieId, Vec<Video>>>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            total_pages: AtomicU32::new(10),
            search_delays: Mutex::new(HashMap::new()),
            fail_movies: AtomicBool::new(false),
            fail_genres: AtomicBool::new(false),
            fail_detail: AtomicBool::new(false),
            details: Mutex::new(HashMap::new()),
            videos: Mutex::new(HashMap::new()),
        }
    }
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Search and discover calls only, in issue order.
    pub fn movie_calls(&self) -> Vec<CatalogCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, CatalogCall::Search { .. } | CatalogCall::Discover { .. }))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Raw page count reported by subsequent search/discover responses.
    pub fn set_total_pages(&self, total: u32) {
        self.total_pages.store(total, Ordering::SeqCst);
    }

    pub fn delay_search(&self, query: &str, delay: Duration) {
        self.search_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    pub fn fail_movies(&self, fail: bool) {
        self.fail_movies.store(fail, Ordering::SeqCst);
    }

    pub fn fail_genres(&self, fail: bool) {
        self.fail_genres.store(fail, Ordering::SeqCst);
    }

    pub fn fail_detail(&self, fail: bool) {
        self.fail_detail.store(fail, Ordering::SeqCst);
    }

    pub fn insert_detail(&self, detail: MovieDetail) {
        self.details.lock().unwrap().insert(detail.id, detail);
    }

    pub fn insert_videos(&self, movie_id: MovieId, videos: Vec<Video>) {
        self.videos.lock().unwrap().insert(movie_id, videos);
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn page(&self, title: String) -> Result<MoviePage> {
        if self.fail_movies.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }
        Ok(MoviePage {
            results: vec![movie(1, &title)],
            total_pages: self.total_pages.load(Ordering::SeqCst),
        })
    }
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.record(CatalogCall::Genres);
        if self.fail_genres.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ])
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        self.record(CatalogCall::Search {
            query: query.to_string(),
            page,
        });
        let delay = self.search_delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.page(query.to_string())
    }

    async fn discover_movies(&self, page: u32, genre_id: Option<GenreId>) -> Result<MoviePage> {
        self.record(CatalogCall::Discover { page, genre_id });
        let genre = genre_id.map(|g| g.to_string()).unwrap_or_default();
        self.page(format!("discover:{}:{}", page, genre))
    }

    async fn get_movie_detail(&self, movie_id: MovieId) -> Result<Option<MovieDetail>> {
        self.record(CatalogCall::Detail(movie_id));
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(AppError::Network("timeout".to_string()));
        }
        Ok(self.details.lock().unwrap().get(&movie_id).cloned())
    }

    async fn get_movie_videos(&self, movie_id: MovieId) -> Result<Vec<Video>> {
        self.record(CatalogCall::Videos(movie_id));
        Ok(self
            .videos
            .lock()
            .unwrap()
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FAVORITES STORE
// ═══════════════════════════════════════════════════════════════════════════

/// Memory store that can be slowed down, made to fail, and counts writes.
#[derive(Default)]
pub struct FakeStore {
    inner: MemoryFavoritesStore,
    fail: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    read_delay: Mutex<Option<Duration>>,
    mutations: AtomicUsize,
}

#[allow(dead_code)]
impl FakeStore {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    /// Point reads return what they saw before this delay.
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    /// Successful puts and deletes so far.
    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Seed a record directly, bypassing failure injection and counting.
    pub async fn seed(&self, identity_id: &str, record: &FavoriteRecord) {
        self.inner.put_favorite(identity_id, record).await.unwrap();
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Store("unavailable".to_string()));
        }
        Ok(())
    }

    async fn delay(&self) {
        Self::sleep(&self.write_delay).await;
    }

    async fn sleep(delay: &Mutex<Option<Duration>>) {
        let delay = *delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl FavoritesStore for FakeStore {
    async fn put_favorite(&self, identity_id: &str, record: &FavoriteRecord) -> Result<()> {
        self.delay().await;
        self.check()?;
        self.inner.put_favorite(identity_id, record).await?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_favorite(&self, identity_id: &str, movie_id: MovieId) -> Result<()> {
        self.delay().await;
        self.check()?;
        self.inner.delete_favorite(identity_id, movie_id).await?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_favorite(
        &self,
        identity_id: &str,
        movie_id: MovieId,
    ) -> Result<Option<FavoriteRecord>> {
        self.check()?;
        let found = self.inner.get_favorite(identity_id, movie_id).await;
        Self::sleep(&self.read_delay).await;
        found
    }

    async fn list_favorites(&self, identity_id: &str) -> Result<Vec<FavoriteRecord>> {
        self.check()?;
        self.inner.list_favorites(identity_id).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// IDENTITY PROVIDER
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    SignUp(String),
    UpdateDisplayName(String),
    SignIn(String),
    SignInWithIdp(String),
    SignOut,
}

/// Identity provider whose session starts `Pending` until the test publishes.
pub struct FakeIdentityProvider {
    session: watch::Sender<SessionState>,
    calls: Mutex<Vec<IdentityCall>>,
    reject_with: Mutex<Option<AuthErrorCode>>,
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        let (session, _) = watch::channel(SessionState::Pending);
        Self {
            session,
            calls: Mutex::new(Vec::new()),
            reject_with: Mutex::new(None),
        }
    }
}

#[allow(dead_code)]
impl FakeIdentityProvider {
    /// Push a session notification, as the provider would on a change.
    pub fn publish(&self, state: SessionState) {
        self.session.send_replace(state);
    }

    /// Make every following account call fail with `code`.
    pub fn reject_with(&self, code: AuthErrorCode) {
        *self.reject_with.lock().unwrap() = Some(code);
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().unwrap().clone()
    }

    fn begin(&self, call: IdentityCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.reject_with.lock().unwrap().clone() {
            Some(code) => Err(AppError::Auth(code)),
            None => Ok(()),
        }
    }

    fn signed_in(&self, identity: Identity) -> Identity {
        self.publish(SessionState::Ready(Some(identity.clone())));
        identity
    }

    fn current(&self) -> Option<Identity> {
        self.session.borrow().identity().cloned()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<Identity> {
        self.begin(IdentityCall::SignUp(email.to_string()))?;
        Ok(self.signed_in(Identity {
            id: format!("uid-{}", email),
            display_name: None,
            email: Some(email.to_string()),
        }))
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity> {
        self.begin(IdentityCall::UpdateDisplayName(display_name.to_string()))?;
        let mut identity = self
            .current()
            .ok_or_else(|| AppError::Auth(AuthErrorCode::Other("auth/no-current-user".into())))?;
        identity.display_name = Some(display_name.to_string());
        Ok(self.signed_in(identity))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity> {
        self.begin(IdentityCall::SignIn(email.to_string()))?;
        Ok(self.signed_in(Identity {
            id: format!("uid-{}", email),
            display_name: None,
            email: Some(email.to_string()),
        }))
    }

    async fn sign_in_with_idp(&self, provider_id: &str, _id_token: &str) -> Result<Identity> {
        self.begin(IdentityCall::SignInWithIdp(provider_id.to_string()))?;
        Ok(self.signed_in(Identity {
            id: "uid-google".to_string(),
            display_name: Some("Google User".to_string()),
            email: Some("user@gmail.com".to_string()),
        }))
    }

    async fn sign_out(&self) -> Result<()> {
        self.begin(IdentityCall::SignOut)?;
        self.publish(SessionState::Ready(None));
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }
}
