//! Route table and access rules.

use std::fmt;

use serde::Serialize;

use super::SessionState;
use crate::model::Week;

/// A page of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "param", rename_all = "snake_case")]
pub enum Route {
    /// `/`
    Landing,
    /// `/login`
    Login,
    /// `/dashboard`
    Dashboard,
    /// `/timesheet/:week`
    Timesheet(Week),
    /// Anything else
    NotFound(String),
}

impl Route {
    /// Match a path against the route table.
    ///
    /// A trailing slash is ignored. A week segment that is not a positive
    /// integer falls through to `NotFound`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let segments: Vec<&str> = normalized.split('/').skip(1).collect();

        match segments.as_slice() {
            [] if trimmed.starts_with('/') => Self::Landing,
            ["login"] => Self::Login,
            ["dashboard"] => Self::Dashboard,
            ["timesheet", week] => week
                .parse::<Week>()
                .map_or_else(|_| Self::NotFound(trimmed.to_string()), Self::Timesheet),
            _ => Self::NotFound(trimmed.to_string()),
        }
    }

    /// Canonical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Timesheet(week) => format!("/timesheet/{week}"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Whether the route needs an authenticated session.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Timesheet(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Whether a route may be shown in a session state.
///
/// Public routes always are; protected ones only when authenticated.
#[must_use]
pub fn is_route_accessible(route: &Route, state: &SessionState) -> bool {
    !route.is_protected() || state.is_authenticated()
}

/// What the caller should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "to", rename_all = "snake_case")]
pub enum Navigation {
    /// Session restoration has not finished; decide nothing yet.
    Pending,
    /// Show the requested page.
    Render(Route),
    /// Go somewhere else instead.
    Redirect(Route),
}

/// Decide a navigation given the session state.
///
/// Protected routes redirect to the login page when signed out. The login
/// page redirects to the dashboard when already signed in, so a signed-in
/// user never sees the form again.
#[must_use]
pub fn resolve_navigation(route: Route, state: &SessionState) -> Navigation {
    if !is_route_accessible(&route, state) {
        return Navigation::Redirect(Route::Login);
    }
    if route == Route::Login && state.is_authenticated() {
        return Navigation::Redirect(Route::Dashboard);
    }
    Navigation::Render(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserProfile;

    fn signed_in() -> SessionState {
        SessionState::Authenticated(UserProfile {
            email: "test@tentwenty.com".into(),
            name: "TenTest".into(),
        })
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/timesheet/3"), Route::Timesheet(Week::new(3).unwrap()));
        assert_eq!(Route::parse("/timesheet/0"), Route::NotFound("/timesheet/0".into()));
        assert_eq!(Route::parse("/timesheet/abc"), Route::NotFound("/timesheet/abc".into()));
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".into()));
        assert_eq!(Route::parse("dashboard"), Route::NotFound("dashboard".into()));
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/login", "/dashboard", "/timesheet/12"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn test_accessibility() {
        let anonymous = SessionState::Anonymous;
        let week = Route::Timesheet(Week::FIRST);

        assert!(is_route_accessible(&Route::Landing, &anonymous));
        assert!(is_route_accessible(&Route::Login, &anonymous));
        assert!(is_route_accessible(&Route::NotFound("/x".into()), &anonymous));
        assert!(!is_route_accessible(&Route::Dashboard, &anonymous));
        assert!(!is_route_accessible(&week, &anonymous));
        assert!(!is_route_accessible(&Route::Dashboard, &SessionState::Authenticating));

        assert!(is_route_accessible(&Route::Dashboard, &signed_in()));
        assert!(is_route_accessible(&week, &signed_in()));
    }

    #[test]
    fn test_navigation_redirects() {
        assert_eq!(
            resolve_navigation(Route::Dashboard, &SessionState::Anonymous),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            resolve_navigation(Route::Login, &signed_in()),
            Navigation::Redirect(Route::Dashboard)
        );
        assert_eq!(
            resolve_navigation(Route::Login, &SessionState::Anonymous),
            Navigation::Render(Route::Login)
        );
        assert_eq!(
            resolve_navigation(Route::Landing, &signed_in()),
            Navigation::Render(Route::Landing)
        );
    }
}
