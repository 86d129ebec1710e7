// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigable views and the access decision that gates them.

use crate::models::{Identity, MovieId};
use std::fmt;

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Browse,
    SignIn,
    SignUp,
    MovieDetail(MovieId),
    Favorites,
}

/// Whether a route needs a signed-in identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    RedirectTo(Route),
}

impl Route {
    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Browse | Route::SignIn | Route::SignUp => RouteAccess::Public,
            Route::MovieDetail(_) | Route::Favorites => RouteAccess::Protected,
        }
    }

    /// Parse a client-side path such as `/movie/550`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Browse),
            "/login" => Some(Route::SignIn),
            "/register" => Some(Route::SignUp),
            "/favorites" => Some(Route::Favorites),
            _ => trimmed
                .strip_prefix("/movie/")
                .and_then(|id| id.parse().ok())
                .map(Route::MovieDetail),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Browse => "/".to_string(),
            Route::SignIn => "/login".to_string(),
            Route::SignUp => "/register".to_string(),
            Route::MovieDetail(id) => format!("/movie/{}", id),
            Route::Favorites => "/favorites".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether `route` may be shown to `identity`.
///
/// Protected routes without an identity redirect to sign-in; everything else
/// is allowed.
pub fn can_access(identity: Option<&Identity>, route: &Route) -> Access {
    match (route.access(), identity) {
        (RouteAccess::Protected, None) => Access::RedirectTo(Route::SignIn),
        _ => Access::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROUTES: [Route; 5] = [
        Route::Browse,
        Route::SignIn,
        Route::SignUp,
        Route::MovieDetail(550),
        Route::Favorites,
    ];

    #[test]
    fn test_protected_routes_redirect_without_identity() {
        for route in ALL_ROUTES.iter().filter(|r| r.access() == RouteAccess::Protected) {
            assert_eq!(can_access(None, route), Access::RedirectTo(Route::SignIn));
        }
    }

    #[test]
    fn test_public_routes_always_allowed() {
        let identity = Identity::new("uid-1");
        for route in ALL_ROUTES.iter().filter(|r| r.access() == RouteAccess::Public) {
            assert_eq!(can_access(None, route), Access::Allow);
            assert_eq!(can_access(Some(&identity), route), Access::Allow);
        }
    }

    #[test]
    fn test_signed_in_identity_reaches_protected_routes() {
        let identity = Identity::new("uid-1");
        assert_eq!(can_access(Some(&identity), &Route::Favorites), Access::Allow);
        assert_eq!(
            can_access(Some(&identity), &Route::MovieDetail(1)),
            Access::Allow
        );
    }

    #[test]
    fn test_route_paths_parse_back() {
        for route in ALL_ROUTES {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/movie/abc"), None);
        assert_eq!(Route::parse("/unknown"), None);
        assert_eq!(Route::parse("/favorites/"), Some(Route::Favorites));
    }
}
