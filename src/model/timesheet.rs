//! Timesheet summary model for TickTrack.
//!
//! A summary is the dashboard row for one week. Its hours, status and date
//! range are derived from the week's tasks and never set by users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timesheet status values, derived from logged hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Completed,
    Incomplete,
    Missing,
}

impl TimesheetStatus {
    /// Get the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Missing => "missing",
        }
    }

    /// Label of the dashboard action for a week in this state.
    #[must_use]
    pub const fn action_label(&self) -> &'static str {
        match self {
            Self::Completed => "View",
            Self::Incomplete => "Update",
            Self::Missing => "Create",
        }
    }
}

impl Default for TimesheetStatus {
    fn default() -> Self {
        Self::Missing
    }
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A week number, starting at 1.
///
/// Week 1 is the Monday–Friday span starting 1 January 2024; each
/// following week starts seven days later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Week(u32);

impl Week {
    /// The first week.
    pub const FIRST: Self = Self(1);

    /// Largest accepted week number (keeps every derived date in range).
    pub const MAX: u32 = 1_000_000;

    /// Validate a raw week number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeek` for 0 or anything above [`Week::MAX`].
    pub fn new(n: u32) -> Result<Self> {
        if n == 0 || n > Self::MAX {
            return Err(Error::InvalidWeek { input: n.to_string() });
        }
        Ok(Self(n))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The week after this one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeek` past [`Week::MAX`].
    pub fn next(self) -> Result<Self> {
        Self::new(self.0 + 1)
    }
}

impl TryFrom<u32> for Week {
    type Error = Error;

    fn try_from(n: u32) -> Result<Self> {
        Self::new(n)
    }
}

impl From<Week> for u32 {
    fn from(week: Week) -> Self {
        week.0
    }
}

impl FromStr for Week {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidWeek { input: s.to_string() })
            .and_then(Self::new)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dashboard row for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    /// Sequential identifier, assigned on creation
    pub id: u64,

    /// Week number (unique within a directory)
    pub week: Week,

    /// Human-readable Monday–Friday range
    pub date: String,

    /// Derived status
    pub status: TimesheetStatus,

    /// Derived total of logged hours
    pub hours_logged: f64,
}

impl TimesheetSummary {
    /// A fresh summary: no hours, status missing.
    pub fn new(id: u64, week: Week) -> Self {
        Self {
            id,
            week,
            date: crate::aggregate::derive_date_range(week),
            status: TimesheetStatus::Missing,
            hours_logged: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_parsing() {
        assert_eq!("3".parse::<Week>().unwrap().get(), 3);
        assert_eq!(" 12 ".parse::<Week>().unwrap().get(), 12);
        assert!(matches!("0".parse::<Week>(), Err(Error::InvalidWeek { .. })));
        assert!(matches!("-1".parse::<Week>(), Err(Error::InvalidWeek { .. })));
        assert!(matches!("abc".parse::<Week>(), Err(Error::InvalidWeek { .. })));
        assert!(Week::new(Week::MAX + 1).is_err());
        assert_eq!(Week::new(4).unwrap().next().unwrap().get(), 5);
    }

    #[test]
    fn test_week_serde_rejects_zero() {
        assert!(serde_json::from_str::<Week>("0").is_err());
        assert_eq!(serde_json::from_str::<Week>("5").unwrap(), Week::new(5).unwrap());
    }

    #[test]
    fn test_new_summary_is_missing() {
        let summary = TimesheetSummary::new(6, Week::new(6).unwrap());
        assert_eq!(summary.status, TimesheetStatus::Missing);
        assert_eq!(summary.hours_logged, 0.0);
        assert_eq!(summary.date, "5 – 9 February, 2024");
    }

    #[test]
    fn test_summary_json_field_names() {
        let summary = TimesheetSummary::new(1, Week::FIRST);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["hoursLogged"], 0.0);
        assert_eq!(json["status"], "missing");
        assert_eq!(json["week"], 1);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(TimesheetStatus::Completed.action_label(), "View");
        assert_eq!(TimesheetStatus::Incomplete.action_label(), "Update");
        assert_eq!(TimesheetStatus::Missing.action_label(), "Create");
    }
}
