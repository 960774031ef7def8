//! Response envelopes of the data-access interface.

use serde::{Deserialize, Serialize};

use crate::model::{TimesheetSummary, UserProfile, WeekTasks};

/// Outcome of a credential check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    #[must_use]
    pub fn accepted(token: &str, user: UserProfile) -> Self {
        Self {
            success: true,
            token: Some(token.to_string()),
            user: Some(user),
            message: None,
        }
    }

    #[must_use]
    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            token: None,
            user: None,
            message: Some(message.to_string()),
        }
    }
}

/// Bare acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetList {
    pub success: bool,
    pub timesheets: Vec<TimesheetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetDetail {
    pub success: bool,
    pub timesheet: TimesheetSummary,
    pub tasks: WeekTasks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    /// Summary as reconciled right after the save
    pub timesheet: TimesheetSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub success: bool,
    pub timesheet: TimesheetSummary,
}
