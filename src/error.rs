//! Error types for TickTrack.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=auth, 3=not_found, 4=validation, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Nothing here is fatal: every variant ends up as a one-line notice on
//! stderr (or a JSON object with `--json`) and a non-zero exit code.

use thiserror::Error;

/// Result type alias for TickTrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown for any credential mismatch. Never says which field was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message shown when a task row is saved without description or hours.
pub const MISSING_TASK_FIELDS_MESSAGE: &str = "Please fill in task description and hours";

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Auth (exit 2)
    InvalidCredentials,
    NotAuthenticated,

    // Not Found (exit 3)
    RouteNotFound,

    // Validation (exit 4)
    RequiredField,
    InvalidArgument,
    InvalidWeek,

    // Conflict (exit 5)
    WeekExists,

    // Transport (exit 6)
    TransportError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidWeek => "INVALID_WEEK",
            Self::WeekExists => "WEEK_EXISTS",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::InvalidCredentials | Self::NotAuthenticated => 2,
            Self::RouteNotFound => 3,
            Self::RequiredField | Self::InvalidArgument | Self::InvalidWeek => 4,
            Self::WeekExists => 5,
            Self::TransportError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller may retry, either with corrected input or as-is.
    ///
    /// True for validation and credential errors and for transport
    /// failures. There is no automatic retry anywhere in the crate.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::RequiredField
                | Self::InvalidArgument
                | Self::InvalidWeek
                | Self::TransportError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in TickTrack operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Not signed in: {path} requires an authenticated session")]
    NotAuthenticated { path: String },

    #[error("Page not found: {path}")]
    RouteNotFound { path: String },

    #[error("{message}")]
    RequiredField { field: String, message: String },

    #[error("Invalid week: {input} (weeks start at 1)")]
    InvalidWeek { input: String },

    #[error("Week {week} timesheet already exists")]
    WeekExists { week: u32 },

    #[error("Transport failure during {operation}")]
    Transport { operation: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Presence-check failure for a named field with the default message.
    pub fn required(field: &str) -> Self {
        Self::RequiredField {
            field: field.to_string(),
            message: format!("{field} is required"),
        }
    }

    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::NotAuthenticated { .. } => ErrorCode::NotAuthenticated,
            Self::RouteNotFound { .. } => ErrorCode::RouteNotFound,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::InvalidWeek { .. } => ErrorCode::InvalidWeek,
            Self::WeekExists { .. } => ErrorCode::WeekExists,
            Self::Transport { .. } => ErrorCode::TransportError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotAuthenticated { .. } => {
                Some("Sign in first: tt login <email> <password>".to_string())
            }

            Self::RouteNotFound { .. } => Some(
                "Known pages: /, /login, /dashboard, /timesheet/<week>".to_string(),
            ),

            Self::InvalidWeek { .. } => {
                Some("Week numbers are positive integers; week 1 starts 1 January 2024".to_string())
            }

            Self::WeekExists { week } => Some(format!(
                "Open it instead: tt show {week}, or run `tt create` to add the next week"
            )),

            Self::Transport { .. } => {
                Some("Nothing was changed. Try the operation again.".to_string())
            }

            Self::InvalidArgument(msg) => {
                if msg.contains("day") {
                    Some("Valid days: mon, tue, wed, thu, fri (or 1-5)".to_string())
                } else {
                    None
                }
            }

            Self::InvalidCredentials
            | Self::RequiredField { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
