//! Data models for TickTrack.
//!
//! This module contains all domain models:
//! - Task, Hours, DayKey, WeekTasks
//! - Week, TimesheetSummary, TimesheetStatus
//! - UserProfile

pub mod task;
pub mod timesheet;
pub mod user;

pub use task::{DayKey, Hours, Task, WeekTasks};
pub use timesheet::{TimesheetStatus, TimesheetSummary, Week};
pub use user::UserProfile;
