//! In-memory storage layer for TickTrack.
//!
//! Timesheet data lives only as long as the process: there is no database
//! and nothing is written to disk. One [`TaskStore`] is constructed per
//! application instance (or per test) and owned by the
//! [`TimesheetDirectory`](crate::directory::TimesheetDirectory).
//!
//! # Submodules
//!
//! - [`memory`] - The store itself
//! - [`seed`] - Demo weeks loaded at startup

pub mod memory;
pub mod seed;

pub use memory::TaskStore;
