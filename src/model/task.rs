//! Task model for TickTrack.
//!
//! A task is one logged work item on one calendar day. Tasks are grouped
//! into day buckets keyed by [`DayKey`], and a week's buckets form a
//! [`WeekTasks`] map.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::parse_hours;

/// Day buckets for one week: day-key → tasks in display order.
pub type WeekTasks = BTreeMap<DayKey, Vec<Task>>;

/// Bucket key for one calendar day, e.g. `mon-1` or `fri-12`.
///
/// Built from the lowercase weekday abbreviation and the day of month.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// Derive the key for a calendar date.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let weekday = date.format("%a").to_string().to_lowercase();
        Self(format!("{weekday}-{}", date.day()))
    }

    /// Wrap an already-formatted key (as found in stored data).
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logged hours for a task.
///
/// Numeric at rest; free text while a row is being edited. Reading the
/// value never fails: text that does not start with a number counts as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hours {
    Number(f64),
    Text(String),
}

impl Hours {
    /// Numeric value used for aggregation.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => n.max(0.0),
            Self::Number(_) => 0.0,
            Self::Text(s) => parse_hours(s),
        }
    }

    /// Whether anything was entered at all (presence check only).
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(_) => true,
            Self::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Convert the editing representation to the at-rest one.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::Number(self.value())
    }
}

impl Default for Hours {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single logged work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (stable for the lifetime of the process)
    pub id: Uuid,

    /// Free text; empty until the row is first saved
    #[serde(default)]
    pub description: String,

    /// Logged hours
    #[serde(default)]
    pub hours: Hours,

    /// Calendar day the task belongs to
    pub date: NaiveDate,
}

impl Task {
    /// Create an empty task for a day slot.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            hours: Hours::default(),
            date,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set numeric hours.
    #[must_use]
    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = Hours::Number(hours);
        self
    }

    /// The bucket this task belongs in.
    #[must_use]
    pub fn day_key(&self) -> DayKey {
        DayKey::for_date(self.date)
    }
}
