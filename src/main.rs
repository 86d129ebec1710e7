// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie-Shelf terminal front end
//!
//! Reads one command per line from stdin and renders views to stdout.
//! Logs go to stderr as JSON.

use movie_shelf::{
    config::{Config, FavoritesBackend},
    coordinators::{BrowseCoordinator, DetailCoordinator, FavoritesListCoordinator, SignUpForm},
    db::{FavoritesStorePtr, FirestoreDb, MemoryFavoritesStore},
    guard::{can_access, Access, Route},
    notice::{Notice, NoticeLevel, Notifier},
    services::{FavoritesService, FirebaseAuth, IdentitySession, TmdbClient},
    AppState,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Genres shown in the browse view besides "All".
const GENRES_SHOWN: usize = 8;

const HELP: &str = "\
commands:
  go <path>                      open /, /login, /register, /movie/<id>, /favorites
  search <text>                  type into the search box
  submit                         submit the search form
  genre <id|all>                 filter by genre
  page <n> | next | prev         change page
  show                           render the current view
  login <email> <password>
  google <id-token>
  register <email> <password> <display name>
  logout
  fav                            toggle favorite (movie view)
  remove <movie id>              remove favorite (favorites view)
  quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        backend = ?config.favorites_backend,
        language = %config.tmdb_language,
        "Starting Movie-Shelf"
    );

    let catalog = Arc::new(TmdbClient::from_config(&config).expect("Failed to create TMDB client"));

    let store: FavoritesStorePtr = match config.favorites_backend {
        FavoritesBackend::Firestore => Arc::new(
            FirestoreDb::new(&config.gcp_project_id)
                .await
                .expect("Failed to connect to Firestore"),
        ),
        FavoritesBackend::Memory => {
            tracing::warn!("Favorites are kept in memory and lost on exit");
            Arc::new(MemoryFavoritesStore::new())
        }
    };

    let identity = Arc::new(FirebaseAuth::from_config(&config));
    let session = IdentitySession::init(identity.as_ref());

    let (notifier, notices) = Notifier::channel();
    let printer = tokio::spawn(print_notices(notices));

    let state = AppState {
        config,
        catalog,
        favorites: FavoritesService::new(store),
        identity,
        session: session.handle(),
        notifier,
    };

    // Identity-dependent views wait for the first session notification.
    let current = state.session.ready().await;
    tracing::info!(
        identity_id = current.as_ref().map(|i| i.id.as_str()),
        "Session ready"
    );
    if let Some(identity) = &current {
        println!("signed in as {}", identity.label());
    }

    run(&state).await?;

    session.teardown();
    printer.abort();
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("movie_shelf=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

async fn print_notices(mut notices: tokio::sync::mpsc::UnboundedReceiver<Notice>) {
    while let Some(notice) = notices.recv().await {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        println!("[{}] {}", tag, notice.message);
    }
}

/// Active view. Dropping it tears the view down.
enum View {
    Browse {
        coordinator: BrowseCoordinator,
        renderer: JoinHandle<()>,
    },
    Detail(DetailCoordinator),
    Favorites(FavoritesListCoordinator),
    SignIn,
    SignUp,
}

impl Drop for View {
    fn drop(&mut self) {
        if let View::Browse { renderer, .. } = self {
            renderer.abort();
        }
    }
}

async fn run(state: &AppState) -> std::io::Result<()> {
    println!("{}", HELP);
    let mut view = open(state, Route::Browse).await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "go" => match Route::parse(arg) {
                Some(route) => view = open(state, route).await,
                None => println!("unknown path: {}", arg),
            },
            "show" => render(&view),
            "search" | "submit" | "genre" | "page" | "next" | "prev" => {
                browse_command(&view, command, arg)
            }
            "login" => {
                let mut parts = arg.split_whitespace();
                let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
                    println!("usage: login <email> <password>");
                    continue;
                };
                if let Ok(identity) = state.account().sign_in(email, password).await {
                    println!("signed in as {}", identity.label());
                    view = open(state, Route::Browse).await;
                }
            }
            "google" => {
                if let Ok(identity) = state.account().sign_in_with_google(arg).await {
                    println!("signed in as {}", identity.label());
                    view = open(state, Route::Browse).await;
                }
            }
            "register" => {
                let mut parts = arg.splitn(3, ' ');
                let (Some(email), Some(password), Some(name)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    println!("usage: register <email> <password> <display name>");
                    continue;
                };
                let form = SignUpForm {
                    display_name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                };
                if let Ok(identity) = state.account().sign_up(&form).await {
                    println!("signed in as {}", identity.label());
                    view = open(state, Route::Browse).await;
                }
            }
            "logout" => {
                if state.account().sign_out().await.is_ok() {
                    view = open(state, Route::SignIn).await;
                }
            }
            "fav" => match &view {
                View::Detail(detail) => {
                    let outcome = detail.toggle_favorite().await;
                    tracing::debug!(?outcome, "Toggle finished");
                    render(&view);
                }
                _ => println!("open a movie first"),
            },
            "remove" => match (&view, arg.parse()) {
                (View::Favorites(list), Ok(movie_id)) => {
                    list.remove_one(movie_id).await;
                    render(&view);
                }
                (View::Favorites(_), Err(_)) => println!("usage: remove <movie id>"),
                _ => println!("open /favorites first"),
            },
            other => println!("unknown command: {} (try help)", other),
        }
    }
    Ok(())
}

/// Open `route`, redirecting to sign-in when the guard says so.
async fn open(state: &AppState, route: Route) -> View {
    let identity = state.session.current();
    let route = match can_access(identity.as_ref(), &route) {
        Access::Allow => route,
        Access::RedirectTo(target) => {
            println!("{} requires sign-in", route);
            target
        }
    };
    tracing::debug!(route = %route, "Opening view");

    let view = match route {
        Route::Browse => {
            let coordinator = state.browse();
            let renderer = tokio::spawn(render_browse_updates(coordinator.subscribe()));
            View::Browse {
                coordinator,
                renderer,
            }
        }
        Route::MovieDetail(movie_id) => {
            let detail = state.detail(movie_id);
            detail.load().await;
            View::Detail(detail)
        }
        Route::Favorites => {
            let list = state.favorites_list();
            list.load().await;
            View::Favorites(list)
        }
        Route::SignIn => {
            println!("sign in: login <email> <password> | google <id-token>");
            View::SignIn
        }
        Route::SignUp => {
            println!("register: register <email> <password> <display name>");
            View::SignUp
        }
    };
    render(&view);
    view
}

fn browse_command(view: &View, command: &str, arg: &str) {
    let View::Browse { coordinator, .. } = view else {
        println!("open / first");
        return;
    };
    match command {
        "search" => coordinator.set_search_text(arg),
        "submit" => coordinator.submit_search(),
        "genre" => match arg {
            "" | "all" => coordinator.set_genre_filter(None),
            id => match id.parse() {
                Ok(id) => coordinator.set_genre_filter(Some(id)),
                Err(_) => println!("usage: genre <id|all>"),
            },
        },
        "page" => match arg.parse() {
            Ok(page) => coordinator.set_page(page),
            Err(_) => println!("usage: page <n>"),
        },
        "next" => coordinator.set_page(coordinator.state().page.saturating_add(1)),
        "prev" => coordinator.set_page(coordinator.state().page.saturating_sub(1)),
        _ => {}
    }
}

/// Re-render the browse view whenever a fetch completes.
async fn render_browse_updates(
    mut states: tokio::sync::watch::Receiver<movie_shelf::coordinators::BrowseState>,
) {
    let mut last_rendered = None;
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        let key = (state.loading, state.page, state.results.clone());
        if state.loading || last_rendered.as_ref() == Some(&key) {
            continue;
        }
        print_browse(&state);
        last_rendered = Some(key);
    }
}

fn render(view: &View) {
    match view {
        View::Browse { coordinator, .. } => {
            let state = coordinator.state();
            if !state.loading {
                print_browse(&state);
            }
        }
        View::Detail(detail) => {
            let state = detail.state();
            let Some(movie) = &state.detail else {
                if state.not_found {
                    println!("Movie not found.");
                }
                return;
            };
            println!("{} ({})", movie.title, movie.release_year().unwrap_or("-"));
            if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
                println!("  \"{}\"", tagline);
            }
            let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
            println!(
                "  rating {:.1} ({:?})  runtime {} min  genres {}",
                movie.vote_average,
                movie.summary().rating_tier(),
                movie.runtime.unwrap_or(0),
                genres.join(", ")
            );
            println!("  {}", movie.overview_text());
            println!("  poster {}", movie.poster_url());
            if let Some(backdrop) = movie.backdrop_url() {
                println!("  backdrop {}", backdrop);
            }
            if let Some(trailer) = &state.trailer {
                println!("  trailer {}", trailer.embed_url());
            }
            println!(
                "  favorite: {}{}",
                if state.is_favorite { "yes" } else { "no" },
                if state.toggle_in_flight { " (saving)" } else { "" }
            );
        }
        View::Favorites(list) => {
            let state = list.state();
            if state.favorites.is_empty() {
                println!("No favorites yet. Try: go /");
                return;
            }
            for fav in &state.favorites {
                println!(
                    "  {:>8}  {}  {:.1} ({:?})  {}",
                    fav.movie_id,
                    fav.title,
                    fav.vote_average,
                    fav.rating_tier(),
                    fav.poster_url()
                );
            }
        }
        View::SignIn | View::SignUp => {}
    }
}

fn print_browse(state: &movie_shelf::coordinators::BrowseState) {
    let genres: Vec<String> = state
        .genres
        .iter()
        .take(GENRES_SHOWN)
        .map(|g| {
            let marker = if state.genre_filter == Some(g.id) { "*" } else { "" };
            format!("{}{}={}", marker, g.id, g.name)
        })
        .collect();
    println!("genres: all {}", genres.join(" "));
    println!("page {}/{}", state.page, state.total_pages);
    for movie in &state.results {
        println!(
            "  {:>8}  {}  {:.1} ({:?})",
            movie.id,
            movie.title,
            movie.vote_average,
            movie.rating_tier()
        );
    }
}
