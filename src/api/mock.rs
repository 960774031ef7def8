//! In-memory backend with simulated latency.
//!
//! [`MockApi`] owns one [`TimesheetDirectory`] behind an async mutex. Each
//! call sleeps for its configured latency, then locks the directory and
//! runs to completion. Two saves of the same week are never merged: the
//! one that finishes last wins.
//!
//! The backend knows exactly one identity. Credentials are compared as plain
//! strings, case-sensitively.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::{Ack, Created, LoginResponse, SaveResponse, TimesheetDetail, TimesheetList};
use super::{AuthApi, TimesheetApi};
use crate::config::Latency;
use crate::directory::TimesheetDirectory;
use crate::error::{Error, INVALID_CREDENTIALS_MESSAGE, Result};
use crate::model::{UserProfile, Week, WeekTasks};

/// Email of the only account.
pub const MOCK_EMAIL: &str = "test@tentwenty.com";

/// Password of the only account.
pub const MOCK_PASSWORD: &str = "123456";

/// Display name of the only account.
pub const MOCK_NAME: &str = "TenTest";

/// Opaque token issued on every successful login.
pub const SESSION_TOKEN: &str = "abc123_tentwenty_auth_token";

/// Message returned after a successful save.
pub const SAVED_MESSAGE: &str = "Tasks saved successfully";

/// Public profile of the only account.
#[must_use]
pub fn mock_profile() -> UserProfile {
    UserProfile {
        email: MOCK_EMAIL.to_string(),
        name: MOCK_NAME.to_string(),
    }
}

/// In-memory implementation of both backend traits.
///
/// Clones share the same directory and transport switch.
#[derive(Debug, Clone)]
pub struct MockApi {
    directory: Arc<Mutex<TimesheetDirectory>>,
    latency: Latency,
    offline: Arc<AtomicBool>,
}

impl MockApi {
    /// Backend over a given directory.
    #[must_use]
    pub fn new(directory: TimesheetDirectory, latency: Latency) -> Self {
        Self {
            directory: Arc::new(Mutex::new(directory)),
            latency,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Backend preloaded with the demo weeks.
    #[must_use]
    pub fn seeded(latency: Latency) -> Self {
        Self::new(TimesheetDirectory::from_seed(), latency)
    }

    /// Make every following call fail as a transport error (or stop doing so).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Highest week plus one, read without simulated latency.
    ///
    /// # Errors
    ///
    /// Returns `Transport` while offline, or `InvalidWeek` when no later
    /// week can exist.
    pub async fn next_week(&self) -> Result<Week> {
        self.transport("next_week", Duration::ZERO).await?;
        self.directory.lock().await.next_week()
    }

    async fn transport(&self, operation: &str, delay: Duration) -> Result<()> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.offline.load(Ordering::Relaxed) {
            warn!(operation, "Simulated transport failure");
            return Err(Error::Transport {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

impl AuthApi for MockApi {
    async fn login(&self, identifier: &str, secret: &str) -> Result<LoginResponse> {
        self.transport("login", self.latency.login).await?;

        if identifier == MOCK_EMAIL && secret == MOCK_PASSWORD {
            info!(email = identifier, "Login accepted");
            Ok(LoginResponse::accepted(SESSION_TOKEN, mock_profile()))
        } else {
            info!("Login rejected");
            Ok(LoginResponse::rejected(INVALID_CREDENTIALS_MESSAGE))
        }
    }

    async fn logout(&self) -> Result<Ack> {
        self.transport("logout", self.latency.logout).await?;
        Ok(Ack { success: true })
    }

    fn restore(&self, token: &str) -> Option<UserProfile> {
        (token == SESSION_TOKEN).then(mock_profile)
    }
}

impl TimesheetApi for MockApi {
    async fn list_timesheets(&self) -> Result<TimesheetList> {
        self.transport("list_timesheets", self.latency.list).await?;
        let timesheets = self.directory.lock().await.list();
        Ok(TimesheetList {
            success: true,
            timesheets,
        })
    }

    async fn get_timesheet(&self, week: Week) -> Result<TimesheetDetail> {
        self.transport("get_timesheet", self.latency.get).await?;
        let view = self.directory.lock().await.get_or_default(week);
        debug!(week = week.get(), buckets = view.tasks.len(), "Fetched timesheet");
        Ok(TimesheetDetail {
            success: true,
            timesheet: view.timesheet,
            tasks: view.tasks,
        })
    }

    async fn save_tasks(&self, week: Week, tasks: WeekTasks) -> Result<SaveResponse> {
        self.transport("save_tasks", self.latency.save).await?;
        let timesheet = self.directory.lock().await.save_tasks(week, tasks);
        Ok(SaveResponse {
            success: true,
            message: SAVED_MESSAGE.to_string(),
            timesheet,
        })
    }

    async fn create_timesheet(&self, week: Week) -> Result<Created> {
        self.transport("create_timesheet", self.latency.create).await?;
        let timesheet = self.directory.lock().await.create(week)?;
        Ok(Created {
            success: true,
            timesheet,
        })
    }
}
