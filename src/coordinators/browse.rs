// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog browsing view-state.
//!
//! A single task owns [`BrowseState`] and applies commands in order. Any
//! change to the committed search text, genre filter or page issues exactly
//! one catalog fetch. Fetches are numbered; only the latest one may update
//! the results.

use crate::coordinators::debounce::{Debounced, Debouncer};
use crate::error::Result;
use crate::models::{Genre, GenreId, MoviePage, MovieSummary};
use crate::notice::Notifier;
use crate::services::CatalogPtr;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Snapshot of the browse view.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    /// Text as typed
    pub search_text: String,
    /// Text after the quiet period; drives search vs. discover
    pub debounced_search_text: String,
    pub genre_filter: Option<GenreId>,
    /// Current page, always within `1..=total_pages`
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieSummary>,
    pub genres: Vec<Genre>,
    pub loading: bool,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            debounced_search_text: String::new(),
            genre_filter: None,
            page: 1,
            total_pages: 1,
            results: Vec::new(),
            genres: Vec::new(),
            loading: true,
        }
    }
}

impl BrowseState {
    /// The catalog request the current state calls for.
    pub fn query(&self) -> BrowseQuery {
        if self.debounced_search_text.trim().is_empty() {
            BrowseQuery::Discover {
                page: self.page,
                genre_id: self.genre_filter,
            }
        } else {
            BrowseQuery::Search {
                text: self.debounced_search_text.clone(),
                page: self.page,
            }
        }
    }

    fn fetch_key(&self) -> (String, Option<GenreId>, u32) {
        (
            self.debounced_search_text.clone(),
            self.genre_filter,
            self.page,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseQuery {
    Search { text: String, page: u32 },
    Discover { page: u32, genre_id: Option<GenreId> },
}

enum BrowseCommand {
    SetSearchText(String),
    SubmitSearch,
    SetGenreFilter(Option<GenreId>),
    SetPage(u32),
    SearchCommitted(Debounced<String>),
    GenresLoaded(Result<Vec<Genre>>),
    MoviesLoaded { seq: u64, result: Result<MoviePage> },
}

/// Handle to the browse view. Dropping it tears the view down, including any
/// pending search commit.
pub struct BrowseCoordinator {
    commands: mpsc::UnboundedSender<BrowseCommand>,
    state: watch::Receiver<BrowseState>,
    actor: JoinHandle<()>,
}

impl BrowseCoordinator {
    /// Activate the view: load genres and the first discover page.
    pub fn spawn(catalog: CatalogPtr, notifier: Notifier, debounce: Duration) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (published, state) = watch::channel(BrowseState::default());

        let actor = BrowseActor {
            state: BrowseState::default(),
            catalog,
            notifier,
            debounce,
            debouncer: Debouncer::new(commands.clone(), BrowseCommand::SearchCommitted),
            commands: commands.clone(),
            published,
            latest_seq: 0,
        };

        Self {
            commands,
            state,
            actor: tokio::spawn(actor.run(rx)),
        }
    }

    /// Update the search box; the text is committed after the quiet period.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.send(BrowseCommand::SetSearchText(text.into()));
    }

    /// Search form submitted: back to page 1, genre filter cleared.
    pub fn submit_search(&self) {
        self.send(BrowseCommand::SubmitSearch);
    }

    /// Select a genre (`None` for all); clears the search text.
    pub fn set_genre_filter(&self, genre_id: Option<GenreId>) {
        self.send(BrowseCommand::SetGenreFilter(genre_id));
    }

    /// Go to `page`, clamped to the known page range.
    pub fn set_page(&self, page: u32) {
        self.send(BrowseCommand::SetPage(page));
    }

    pub fn state(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.clone()
    }

    fn send(&self, command: BrowseCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Browse view is no longer active");
        }
    }
}

impl Drop for BrowseCoordinator {
    fn drop(&mut self) {
        self.actor.abort();
    }
}

struct BrowseActor {
    state: BrowseState,
    catalog: CatalogPtr,
    notifier: Notifier,
    debounce: Duration,
    debouncer: Debouncer<String, BrowseCommand>,
    /// Fetch tasks report back through this sender
    commands: mpsc::UnboundedSender<BrowseCommand>,
    published: watch::Sender<BrowseState>,
    latest_seq: u64,
}

impl BrowseActor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<BrowseCommand>) {
        self.load_genres();
        self.fetch_movies();
        self.publish();

        while let Some(command) = rx.recv().await {
            let before = self.state.fetch_key();
            self.handle(command);
            if self.state.fetch_key() != before {
                self.fetch_movies();
            }
            self.publish();
        }
    }

    fn handle(&mut self, command: BrowseCommand) {
        match command {
            BrowseCommand::SetSearchText(text) => {
                self.state.search_text = text.clone();
                self.debouncer.schedule(text, self.debounce);
            }
            BrowseCommand::SearchCommitted(fired) => {
                let Some(text) = self.debouncer.accept(fired) else {
                    return;
                };
                if text == self.state.debounced_search_text {
                    return;
                }
                if !text.trim().is_empty() {
                    self.state.genre_filter = None;
                }
                self.state.debounced_search_text = text;
                self.state.page = 1;
            }
            BrowseCommand::SubmitSearch => {
                self.state.page = 1;
                self.state.genre_filter = None;
            }
            BrowseCommand::SetGenreFilter(genre_id) => {
                self.debouncer.cancel();
                self.state.genre_filter = genre_id;
                self.state.search_text.clear();
                self.state.debounced_search_text.clear();
                self.state.page = 1;
            }
            BrowseCommand::SetPage(page) => {
                self.state.page = page.clamp(1, self.state.total_pages);
            }
            BrowseCommand::GenresLoaded(Ok(genres)) => {
                self.state.genres = genres;
            }
            BrowseCommand::GenresLoaded(Err(e)) => {
                tracing::warn!(error = %e, "Failed to load genres");
                self.notifier.error("Categories could not be loaded!");
            }
            BrowseCommand::MoviesLoaded { seq, result } => self.apply_movies(seq, result),
        }
    }

    fn apply_movies(&mut self, seq: u64, result: Result<MoviePage>) {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "Discarding stale movie page");
            return;
        }

        self.state.loading = false;
        match result {
            Ok(page) => {
                self.state.total_pages = page.capped_total_pages();
                self.state.results = page.results;
                // Keep the page inside a range that may have shrunk.
                self.state.page = self.state.page.min(self.state.total_pages);
            }
            Err(e) => {
                tracing::warn!(error = %e, seq, "Failed to load movies");
                self.notifier.error("Movies could not be loaded!");
            }
        }
    }

    fn load_genres(&self) {
        let catalog = self.catalog.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = catalog.list_genres().await;
            let _ = commands.send(BrowseCommand::GenresLoaded(result));
        });
    }

    fn fetch_movies(&mut self) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let query = self.state.query();
        self.state.loading = true;

        tracing::debug!(seq, query = ?query, "Fetching movies");

        let catalog = self.catalog.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = match query {
                BrowseQuery::Search { text, page } => catalog.search_movies(&text, page).await,
                BrowseQuery::Discover { page, genre_id } => {
                    catalog.discover_movies(page, genre_id).await
                }
            };
            // Closed channel: the view was torn down, drop the result.
            let _ = commands.send(BrowseCommand::MoviesLoaded { seq, result });
        });
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }
}
