//! Session token persistence.
//!
//! A signed-in session is remembered as one opaque token string in one of
//! two scopes:
//!
//! - **Durable**: `<home>/auth/token.json`, survives restarts until logout
//! - **Session**: `<home>/auth/sessions/<key>.json`, bound to the current
//!   terminal and forgotten after [`SESSION_TTL_HOURS`]. Without a terminal
//!   the token is held in memory and lasts as long as the process.
//!
//! The gate only ever compares the loaded token against the expected
//! constant; nothing else in the file is trusted.
//!
//! # Terminal Resolution Strategy
//!
//! 1. `TT_SESSION_KEY` env var (explicit override)
//! 2. Controlling TTY of the nearest ancestor process via `ps`
//! 3. `TERM_SESSION_ID` env var (macOS Terminal.app)
//! 4. `ITERM_SESSION_ID` env var (iTerm2)
//! 5. None: session tokens stay in process memory

use std::collections::HashMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Session-scoped tokens expire after this many hours.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Where a token is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Kept across restarts ("remember me")
    Durable,
    /// Kept for the current terminal session only
    Session,
}

impl TokenScope {
    /// Scope matching a "remember me" choice.
    #[must_use]
    pub const fn from_remember(remember: bool) -> Self {
        if remember { Self::Durable } else { Self::Session }
    }
}

/// On-disk token record.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub token: String,
    pub scope: TokenScope,
    /// Unix milliseconds
    pub issued_at: i64,
}

/// Storage for the session token.
pub trait TokenStore: Send + Sync {
    /// The stored token, durable scope first.
    fn load(&self) -> Option<String>;

    /// Store a token in a scope, replacing any token already there.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope is unavailable or the write fails.
    fn save(&self, scope: TokenScope, token: &str) -> Result<()>;

    /// Remove the token from every scope. Clearing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing token cannot be removed.
    fn clear(&self) -> Result<()>;
}

// ── File-backed store ────────────────────────────────────────

/// Token files under `<home>/auth/`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
    session_key: Option<String>,
    process_slot: Arc<Mutex<Option<String>>>,
}

impl FileTokenStore {
    /// Store rooted at an auth directory, bound to the current terminal.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self::with_session_key(dir, terminal_key())
    }

    /// Store with an explicit terminal key (or none).
    #[must_use]
    pub fn with_session_key(dir: PathBuf, session_key: Option<String>) -> Self {
        Self {
            dir,
            session_key,
            process_slot: Arc::default(),
        }
    }

    fn process_token(&self) -> Option<String> {
        self.process_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_process_token(&self, token: Option<String>) {
        *self.process_slot.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn durable_path(&self) -> PathBuf {
        self.dir.join("token.json")
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.session_key
            .as_deref()
            .map(|key| self.dir.join("sessions").join(format!("{}.json", hash_key(key))))
    }

    fn read_entry(path: &Path) -> Option<TokenEntry> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    fn remove_if_exists(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        if let Some(entry) = Self::read_entry(&self.durable_path()) {
            return Some(entry.token);
        }

        let Some(path) = self.session_path() else {
            return self.process_token();
        };
        let entry = Self::read_entry(&path)?;

        let age_ms = chrono::Utc::now().timestamp_millis().saturating_sub(entry.issued_at);
        if age_ms > SESSION_TTL_HOURS * 60 * 60 * 1000 {
            debug!(path = %path.display(), "Session token expired");
            // Stale entry - try to remove it (ignore errors)
            let _ = fs::remove_file(&path);
            return None;
        }

        Some(entry.token)
    }

    fn save(&self, scope: TokenScope, token: &str) -> Result<()> {
        let path = match (scope, self.session_path()) {
            (TokenScope::Durable, _) => self.durable_path(),
            (TokenScope::Session, Some(path)) => path,
            (TokenScope::Session, None) => {
                debug!("No terminal session detected; keeping token for this process only");
                self.set_process_token(Some(token.to_string()));
                return Ok(());
            }
        };

        let entry = TokenEntry {
            token: token.to_string(),
            scope,
            issued_at: chrono::Utc::now().timestamp_millis(),
        };
        write_atomic(&path, &serde_json::to_string_pretty(&entry)?)?;
        debug!(?scope, path = %path.display(), "Stored session token");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.set_process_token(None);
        Self::remove_if_exists(&self.durable_path())?;
        if let Some(path) = self.session_path() {
            Self::remove_if_exists(&path)?;
        }
        Ok(())
    }
}

/// Write to a temp file with restrictive permissions, then rename into place.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Config(format!("Invalid token path: {}", path.display())))?;
    fs::create_dir_all(dir)?;

    let temp_path = path.with_extension("json.tmp");
    {
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o600);
        let mut file = opts.open(&temp_path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Short SHA-256 of a terminal key, used as the session file name.
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Walk the process tree to find the controlling terminal.
///
/// Processes spawned by editors or wrappers often have no TTY ("??")
/// themselves; the real terminal is held further up the tree.
fn find_tty_from_ancestors() -> Option<String> {
    let mut current_pid = std::process::id().to_string();

    for _ in 0..5 {
        if let Ok(output) = Command::new("ps")
            .args(["-o", "tty=", "-p", &current_pid])
            .output()
        {
            if output.status.success() {
                let tty = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !tty.is_empty() && tty != "?" && tty != "??" {
                    return Some(tty);
                }
            }
        }

        let Ok(output) = Command::new("ps")
            .args(["-o", "ppid=", "-p", &current_pid])
            .output()
        else {
            break;
        };

        if !output.status.success() {
            break;
        }

        let ppid = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if ppid.is_empty() || ppid == "0" || ppid == "1" || ppid == current_pid {
            break;
        }
        current_pid = ppid;
    }

    None
}

/// Identify the current terminal session.
#[must_use]
pub fn terminal_key() -> Option<String> {
    if let Ok(key) = std::env::var("TT_SESSION_KEY") {
        if !key.trim().is_empty() {
            return Some(key.trim().to_string());
        }
    }

    if let Some(tty) = find_tty_from_ancestors() {
        return Some(format!("tty-{tty}"));
    }

    if let Ok(term_id) = std::env::var("TERM_SESSION_ID") {
        if !term_id.is_empty() {
            return Some(format!("term-{term_id}"));
        }
    }

    if let Ok(iterm_id) = std::env::var("ITERM_SESSION_ID") {
        if !iterm_id.is_empty() {
            return Some(format!("iterm-{iterm_id}"));
        }
    }

    None
}

// ── In-memory store ──────────────────────────────────────────

/// Token store that lives in memory.
///
/// Clones share the same slots, so a second gate built from a clone sees
/// what the first one stored (the way two page loads share browser storage).
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slots: Arc<Mutex<HashMap<TokenScope, String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token held in one scope, if any.
    #[must_use]
    pub fn get(&self, scope: TokenScope) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&scope)
            .cloned()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.get(TokenScope::Durable)
            .or_else(|| self.get(TokenScope::Session))
    }

    fn save(&self, scope: TokenScope, token: &str) -> Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope, token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store(temp: &TempDir) -> FileTokenStore {
        FileTokenStore::with_session_key(temp.path().join("auth"), Some("tty-test".to_string()))
    }

    #[test]
    fn test_durable_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = file_store(&temp);
        assert_eq!(store.load(), None);

        store.save(TokenScope::Durable, "tok").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok"));
        assert!(temp.path().join("auth/token.json").exists());

        // A fresh store over the same directory sees it too.
        assert_eq!(file_store(&temp).load().as_deref(), Some("tok"));
    }

    #[test]
    fn test_session_scope_is_per_terminal() {
        let temp = TempDir::new().unwrap();
        let store = file_store(&temp);
        store.save(TokenScope::Session, "tok").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok"));

        let other = FileTokenStore::with_session_key(
            temp.path().join("auth"),
            Some("tty-other".to_string()),
        );
        assert_eq!(other.load(), None);
    }

    #[test]
    fn test_session_scope_without_terminal() {
        let temp = TempDir::new().unwrap();
        let store = FileTokenStore::with_session_key(temp.path().join("auth"), None);
        store.save(TokenScope::Session, "tok").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok"));
        assert!(!temp.path().join("auth/sessions").exists());

        // Nothing reaches disk, so the next process starts signed out.
        let next = FileTokenStore::with_session_key(temp.path().join("auth"), None);
        assert_eq!(next.load(), None);

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stale_session_token_is_dropped() {
        let temp = TempDir::new().unwrap();
        let store = file_store(&temp);
        let path = store.session_path().unwrap();

        let entry = TokenEntry {
            token: "tok".to_string(),
            scope: TokenScope::Session,
            issued_at: chrono::Utc::now().timestamp_millis()
                - (SESSION_TTL_HOURS + 1) * 60 * 60 * 1000,
        };
        write_atomic(&path, &serde_json::to_string(&entry).unwrap()).unwrap();

        assert_eq!(store.load(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = file_store(&temp);
        store.clear().unwrap();

        store.save(TokenScope::Durable, "a").unwrap();
        store.save(TokenScope::Session, "b").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        let store = file_store(&temp);
        fs::create_dir_all(temp.path().join("auth")).unwrap();
        fs::write(temp.path().join("auth/token.json"), "not json").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_hash_key_is_stable() {
        assert_eq!(hash_key("tty-1"), hash_key("tty-1"));
        assert_ne!(hash_key("tty-1"), hash_key("tty-2"));
        assert_eq!(hash_key("tty-1").len(), 16);
    }

    #[test]
    fn test_memory_store_shares_between_clones() {
        let store = MemoryTokenStore::new();
        let twin = store.clone();
        store.save(TokenScope::Session, "s").unwrap();
        assert_eq!(twin.load().as_deref(), Some("s"));

        twin.save(TokenScope::Durable, "d").unwrap();
        assert_eq!(store.load().as_deref(), Some("d"));

        store.clear().unwrap();
        assert_eq!(twin.load(), None);
    }
}
