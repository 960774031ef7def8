//! Asynchronous data-access interface.
//!
//! The rest of the crate talks to its backend only through [`AuthApi`] and
//! [`TimesheetApi`]. The one implementation, [`MockApi`], keeps everything
//! in memory and sleeps for a fixed latency before each operation.
//!
//! Every method returns `Err(Error::Transport)` when the transport fails;
//! a failed call changes nothing and is never retried automatically.

pub mod mock;
pub mod types;

use std::future::Future;

use crate::error::Result;
use crate::model::{UserProfile, Week, WeekTasks};

pub use mock::MockApi;
pub use types::{Ack, Created, LoginResponse, SaveResponse, TimesheetDetail, TimesheetList};

/// Authentication backend.
pub trait AuthApi: Send + Sync {
    /// Check credentials.
    ///
    /// A mismatch is not an `Err`: it comes back as `success: false` with a
    /// user-facing message.
    fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> impl Future<Output = Result<LoginResponse>> + Send;

    /// End the backend side of a session.
    fn logout(&self) -> impl Future<Output = Result<Ack>> + Send;

    /// Profile for a previously issued token, if it is still valid.
    ///
    /// Synchronous so session restoration can finish before the first
    /// routing decision.
    fn restore(&self, token: &str) -> Option<UserProfile>;
}

/// Timesheet backend.
pub trait TimesheetApi: Send + Sync {
    /// All weekly summaries, reconciled.
    fn list_timesheets(&self) -> impl Future<Output = Result<TimesheetList>> + Send;

    /// One week's summary and tasks (get-or-default).
    fn get_timesheet(&self, week: Week) -> impl Future<Output = Result<TimesheetDetail>> + Send;

    /// Replace one week's tasks wholesale.
    fn save_tasks(
        &self,
        week: Week,
        tasks: WeekTasks,
    ) -> impl Future<Output = Result<SaveResponse>> + Send;

    /// Add an empty week.
    fn create_timesheet(&self, week: Week) -> impl Future<Output = Result<Created>> + Send;

    /// [`get_timesheet`](Self::get_timesheet) for a week given as text.
    fn get_timesheet_str(&self, week: &str) -> impl Future<Output = Result<TimesheetDetail>> + Send {
        let parsed = week.parse::<Week>();
        async move { self.get_timesheet(parsed?).await }
    }
}
