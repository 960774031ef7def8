//! Configuration management.
//!
//! This module resolves the TickTrack home directory (where the session
//! token lives) and the simulated network latency of the mock backend.
//!
//! # Architecture
//!
//! TickTrack keeps no timesheet data on disk. The home directory only holds
//! authentication state:
//! - **Durable token**: `<home>/auth/token.json`, survives restarts
//! - **Session tokens**: `<home>/auth/sessions/<key>.json`, one per terminal

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `TT_TEST=1` (or any non-empty value).
/// This redirects the home directory to an isolated location.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("TT_TEST")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

/// Check if simulated latency is disabled via `TT_NO_LATENCY`.
#[must_use]
pub fn latency_disabled_by_env() -> bool {
    std::env::var("TT_NO_LATENCY")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && value.to_lowercase() != "false"
}

/// Get the global TickTrack directory location (`~/.ticktrack/`).
#[must_use]
pub fn global_ticktrack_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ticktrack"))
}

/// Resolve the home directory.
///
/// Priority:
/// 1. If `explicit_path` is provided (`--home`), use it directly
/// 2. `TT_TEST` environment variable → `~/.ticktrack/test`
/// 3. `TT_HOME` environment variable
/// 4. Global location: `~/.ticktrack`
///
/// # Returns
///
/// Returns the home directory, or `None` if no location can be determined.
#[must_use]
pub fn resolve_home(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return global_ticktrack_dir().map(|dir| dir.join("test"));
    }

    if let Ok(home) = std::env::var("TT_HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    global_ticktrack_dir()
}

/// Directory holding token files under a home directory.
#[must_use]
pub fn auth_dir(home: &Path) -> PathBuf {
    home.join("auth")
}

/// Simulated latency of each backend operation.
///
/// The delay is cosmetic: an operation completes after it and before its
/// continuation runs, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latency {
    pub login: Duration,
    pub logout: Duration,
    pub list: Duration,
    pub get: Duration,
    pub save: Duration,
    pub create: Duration,
}

impl Latency {
    /// No delay at all (tests, `--no-latency`).
    pub const NONE: Self = Self {
        login: Duration::ZERO,
        logout: Duration::ZERO,
        list: Duration::ZERO,
        get: Duration::ZERO,
        save: Duration::ZERO,
        create: Duration::ZERO,
    };

    /// Pick the default profile or none, honoring `TT_NO_LATENCY`.
    #[must_use]
    pub fn resolve(disable: bool) -> Self {
        if disable || latency_disabled_by_env() {
            Self::NONE
        } else {
            Self::default()
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(500),
            logout: Duration::ZERO,
            list: Duration::from_millis(300),
            get: Duration::from_millis(200),
            save: Duration::from_millis(300),
            create: Duration::from_millis(300),
        }
    }
}

/// Resolved runtime settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub home: PathBuf,
    pub latency: Latency,
    /// Keep the session token in memory only.
    pub ephemeral: bool,
}

impl Settings {
    /// Resolve settings from CLI flags and the environment.
    ///
    /// # Errors
    ///
    /// Returns `Config` if no home directory can be determined.
    pub fn resolve(
        explicit_home: Option<&Path>,
        no_latency: bool,
        ephemeral: bool,
    ) -> crate::error::Result<Self> {
        let home = resolve_home(explicit_home).ok_or_else(|| {
            crate::error::Error::Config("Could not determine TickTrack home directory".to_string())
        })?;

        Ok(Self {
            home,
            latency: Latency::resolve(no_latency),
            ephemeral,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_home_with_explicit() {
        let explicit = PathBuf::from("/custom/ticktrack");
        assert_eq!(resolve_home(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_global_dir_returns_some() {
        let dir = global_ticktrack_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with(".ticktrack"));
    }

    #[test]
    fn test_auth_dir_is_under_home() {
        assert_eq!(auth_dir(Path::new("/h")), PathBuf::from("/h/auth"));
    }

    #[test]
    fn test_truthy_parsing() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("FALSE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("yes"));
    }

    #[test]
    fn test_latency_profiles() {
        assert_eq!(Latency::resolve(true), Latency::NONE);
        let default = Latency::default();
        assert_eq!(default.login, Duration::from_millis(500));
        assert_eq!(default.get, Duration::from_millis(200));
        assert_eq!(default.logout, Duration::ZERO);
    }

    #[test]
    fn test_settings_with_explicit_home() {
        let settings = Settings::resolve(Some(Path::new("/tmp/tt")), true, false).unwrap();
        assert_eq!(settings.home, PathBuf::from("/tmp/tt"));
        assert_eq!(settings.latency, Latency::NONE);
        assert!(!settings.ephemeral);
    }
}
