//! Session gate: who is signed in, and which pages they may see.
//!
//! # Submodules
//!
//! - [`gate`] - Authentication state machine
//! - [`routes`] - Route table and access decisions
//! - [`token`] - Token persistence (durable and per-terminal scopes)

pub mod gate;
pub mod routes;
pub mod token;

pub use gate::{SessionGate, SessionState};
pub use routes::{Navigation, Route, is_route_accessible, resolve_navigation};
pub use token::{FileTokenStore, MemoryTokenStore, TokenScope, TokenStore};
