//! Command implementations.

pub mod auth;
pub mod completions;
pub mod open;
pub mod shell;
pub mod timesheet;
pub mod version;

use tracing::debug;

use crate::api::MockApi;
use crate::config::{Settings, auth_dir};
use crate::error::{Error, Result};
use crate::session::{
    FileTokenStore, MemoryTokenStore, Navigation, Route, SessionGate, TokenStore,
};

/// Everything a command needs: settings, backend and a restored session.
pub struct App {
    pub settings: Settings,
    pub api: MockApi,
    pub gate: SessionGate,
}

impl App {
    /// Build the backend and restore the session from stored tokens.
    #[must_use]
    pub fn open(settings: Settings) -> Self {
        let tokens: Box<dyn TokenStore> = if settings.ephemeral {
            Box::new(MemoryTokenStore::new())
        } else {
            Box::new(FileTokenStore::new(auth_dir(&settings.home)))
        };
        let api = MockApi::seeded(settings.latency);
        let gate = SessionGate::restore(tokens, &api);
        debug!(
            home = %settings.home.display(),
            authenticated = gate.is_authenticated(),
            "Application ready"
        );
        Self {
            settings,
            api,
            gate,
        }
    }

    /// Resolve a navigation into the page to render.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when a protected page is requested while
    /// signed out, and `RouteNotFound` for unknown paths.
    pub fn guard(&self, route: Route) -> Result<Route> {
        match self.gate.navigate(route.clone()) {
            Navigation::Render(Route::NotFound(path)) => Err(Error::RouteNotFound { path }),
            Navigation::Render(target) => Ok(target),
            Navigation::Redirect(Route::Login) => Err(Error::NotAuthenticated { path: route.path() }),
            Navigation::Redirect(target) => {
                debug!(from = %route, to = %target, "Redirected");
                Ok(target)
            }
            Navigation::Pending => Err(Error::Other("Session is still being restored".to_string())),
        }
    }
}

/// Runtime for driving the async backend from a synchronous command.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}
