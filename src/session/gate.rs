//! Authentication state machine.
//!
//! ```text
//! anonymous ──authenticate──▶ authenticating ──ok──▶ authenticated
//!     ▲                             │                     │
//!     └────────── rejected ─────────┘                     │
//!     └──────────────────────── end_session ──────────────┘
//! ```
//!
//! On startup the gate restores itself from the token store before any
//! routing decision is trusted; until then [`SessionGate::navigate`]
//! answers [`Navigation::Pending`].

use serde::Serialize;
use tracing::{debug, info, warn};

use super::routes::{Navigation, Route, resolve_navigation};
use super::token::{TokenScope, TokenStore};
use crate::api::{AuthApi, LoginResponse};
use crate::error::{Error, Result};
use crate::model::UserProfile;
use crate::validate::require;

/// Where the gate currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "lowercase")]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(UserProfile),
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Guards protected routes for one application instance.
pub struct SessionGate {
    tokens: Box<dyn TokenStore>,
    state: SessionState,
    ready: bool,
}

impl SessionGate {
    /// A gate that has not looked at stored tokens yet.
    #[must_use]
    pub fn new(tokens: Box<dyn TokenStore>) -> Self {
        Self {
            tokens,
            state: SessionState::Anonymous,
            ready: false,
        }
    }

    /// A gate restored from stored tokens, ready for routing.
    #[must_use]
    pub fn restore(tokens: Box<dyn TokenStore>, auth: &impl AuthApi) -> Self {
        let mut gate = Self::new(tokens);
        gate.initialize(auth);
        gate
    }

    /// Resolve the startup state from the stored token and mark the gate ready.
    pub fn initialize(&mut self, auth: &impl AuthApi) {
        self.state = match self.tokens.load().and_then(|token| auth.restore(&token)) {
            Some(user) => {
                debug!(email = %user.email, "Restored session from stored token");
                SessionState::Authenticated(user)
            }
            None => SessionState::Anonymous,
        };
        self.ready = true;
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.state.user()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Validate the form and enter `authenticating`.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField` if either value is blank; the state is left
    /// untouched in that case.
    pub fn begin_authentication(&mut self, identifier: &str, secret: &str) -> Result<()> {
        require("email", identifier)?;
        require("password", secret)?;
        self.state = SessionState::Authenticating;
        Ok(())
    }

    /// Apply the backend's answer to a credential check.
    ///
    /// On success the token is persisted to `scope` first; if that fails the
    /// gate falls back to `anonymous`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on rejection, or the token store error.
    pub fn complete_authentication(
        &mut self,
        response: LoginResponse,
        scope: TokenScope,
    ) -> Result<UserProfile> {
        let (true, Some(token), Some(user)) = (response.success, response.token, response.user)
        else {
            self.state = SessionState::Anonymous;
            return Err(Error::InvalidCredentials);
        };

        if let Err(e) = self.tokens.save(scope, &token) {
            self.state = SessionState::Anonymous;
            return Err(e);
        }

        info!(email = %user.email, ?scope, "Signed in");
        self.state = SessionState::Authenticated(user.clone());
        Ok(user)
    }

    /// Check credentials against the backend and sign in.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField`, `InvalidCredentials`, `Transport`, or a
    /// token store error. The gate ends up `anonymous` in every error case.
    pub async fn authenticate(
        &mut self,
        auth: &impl AuthApi,
        identifier: &str,
        secret: &str,
        scope: TokenScope,
    ) -> Result<UserProfile> {
        self.begin_authentication(identifier, secret)?;

        match auth.login(identifier, secret).await {
            Ok(response) => self.complete_authentication(response, scope),
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    /// Sign out: forget the stored token and return to `anonymous`.
    ///
    /// Safe to call without an active session. A failed backend logout is
    /// logged and does not keep the local session alive.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored token cannot be removed. The gate is
    /// `anonymous` afterwards either way.
    pub async fn end_session(&mut self, auth: &impl AuthApi) -> Result<()> {
        if let Err(e) = auth.logout().await {
            warn!(error = %e, "Backend logout failed; clearing local session anyway");
        }
        let was_signed_in = self.state.is_authenticated();
        self.state = SessionState::Anonymous;
        self.tokens.clear()?;
        if was_signed_in {
            info!("Signed out");
        }
        Ok(())
    }

    /// Decide what to show for a route.
    #[must_use]
    pub fn navigate(&self, route: Route) -> Navigation {
        if !self.ready {
            return Navigation::Pending;
        }
        resolve_navigation(route, &self.state)
    }
}
