//! Timesheet directory: the list of weekly summaries and their tasks.
//!
//! Summaries are never trusted as cached truth. Every read recomputes hours,
//! status and date range from the task buckets, and every write recomputes
//! them straight after replacing the buckets, so a stale status can never be
//! observed.
//!
//! Missing data is not an error here. A week nobody has touched reads as
//! zero hours / `missing`, and the read adds its summary to the directory
//! (the get-or-default policy, see [`TimesheetDirectory::get_or_default`]).

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{compute_week_hours, derive_date_range, derive_status};
use crate::error::{Error, Result};
use crate::model::{TimesheetSummary, Week, WeekTasks};
use crate::storage::{TaskStore, seed};

/// A week's summary together with its task buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    pub timesheet: TimesheetSummary,
    pub tasks: WeekTasks,
}

/// Owns the store and keeps summaries reconciled with tasks.
#[derive(Debug, Clone, Default)]
pub struct TimesheetDirectory {
    store: TaskStore,
}

impl TimesheetDirectory {
    /// A directory over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory over an existing store.
    #[must_use]
    pub fn with_store(store: TaskStore) -> Self {
        Self { store }
    }

    /// A directory preloaded with the demo weeks.
    #[must_use]
    pub fn from_seed() -> Self {
        Self::with_store(seed::seeded_store())
    }

    /// Every known summary, freshly reconciled, in creation order.
    pub fn list(&mut self) -> Vec<TimesheetSummary> {
        let store = &mut self.store;
        let mut reconciled = Vec::with_capacity(store.summaries().len());
        for index in 0..store.summaries().len() {
            let week = store.summaries()[index].week;
            let hours = week_hours(store, week);
            let summary = &mut store.summaries_mut()[index];
            apply_reconciliation(summary, hours);
            reconciled.push(summary.clone());
        }
        debug!(count = reconciled.len(), "Listed timesheets");
        reconciled
    }

    /// Summary and buckets for a week, creating the summary if it is missing.
    ///
    /// The summary is recomputed before returning even when it already
    /// existed. Buckets are returned as stored (empty if none were saved).
    pub fn get_or_default(&mut self, week: Week) -> WeekView {
        let timesheet = self.reconcile_or_insert(week);
        let tasks = self.store.week_tasks(week).cloned().unwrap_or_default();
        WeekView { timesheet, tasks }
    }

    /// Replace a week's buckets wholesale and reconcile its summary.
    ///
    /// A week without a summary gets one, exactly as
    /// [`get_or_default`](Self::get_or_default) would create on read.
    pub fn save_tasks(&mut self, week: Week, tasks: WeekTasks) -> TimesheetSummary {
        let task_count: usize = tasks.values().map(Vec::len).sum();
        self.store.replace_week_tasks(week, tasks);
        let summary = self.reconcile_or_insert(week);
        info!(
            week = week.get(),
            tasks = task_count,
            hours = summary.hours_logged,
            status = %summary.status,
            "Saved week tasks"
        );
        summary
    }

    /// Add an empty week.
    ///
    /// # Errors
    ///
    /// Returns `WeekExists` if the week already has a summary.
    pub fn create(&mut self, week: Week) -> Result<TimesheetSummary> {
        if self.contains(week) {
            return Err(Error::WeekExists { week: week.get() });
        }

        let summary = TimesheetSummary::new(self.store.next_summary_id(), week);
        self.store.push_summary(summary.clone());
        self.store.replace_week_tasks(week, WeekTasks::new());
        info!(week = week.get(), id = summary.id, "Created timesheet");
        Ok(summary)
    }

    /// The week after the highest known one, or week 1 when empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeek` when the highest week is already the last one.
    pub fn next_week(&self) -> Result<Week> {
        self.store
            .summaries()
            .iter()
            .map(|s| s.week)
            .max()
            .map_or(Ok(Week::FIRST), Week::next)
    }

    /// Whether a summary exists for a week (no side effects).
    #[must_use]
    pub fn contains(&self, week: Week) -> bool {
        self.store.summary(week).is_some()
    }

    fn reconcile_or_insert(&mut self, week: Week) -> TimesheetSummary {
        if !self.contains(week) {
            let id = self.store.next_summary_id();
            debug!(week = week.get(), id, "Adding default summary for unknown week");
            self.store.push_summary(TimesheetSummary::new(id, week));
        }

        let hours = week_hours(&self.store, week);
        match self.store.summary_mut(week) {
            Some(summary) => {
                apply_reconciliation(summary, hours);
                summary.clone()
            }
            // Inserted above.
            None => TimesheetSummary::new(0, week),
        }
    }
}

fn week_hours(store: &TaskStore, week: Week) -> f64 {
    store.week_tasks(week).map_or(0.0, compute_week_hours)
}

fn apply_reconciliation(summary: &mut TimesheetSummary, hours: f64) {
    summary.hours_logged = hours;
    summary.status = derive_status(hours);
    summary.date = derive_date_range(summary.week);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::week_days;
    use crate::model::{Hours, Task, TimesheetStatus};

    fn week(n: u32) -> Week {
        Week::new(n).unwrap()
    }

    fn tasks_for(week: Week, hours: &[f64]) -> WeekTasks {
        let days = week_days(week);
        let mut tasks = WeekTasks::new();
        for (day, h) in days.iter().cycle().zip(hours) {
            tasks
                .entry(day.key.clone())
                .or_default()
                .push(Task::new(day.date).with_description("work").with_hours(*h));
        }
        tasks
    }

    #[test]
    fn test_list_reconciles_seed() {
        let mut dir = TimesheetDirectory::from_seed();
        let rows = dir.list();
        let statuses: Vec<_> = rows.iter().map(|r| (r.week.get(), r.status, r.hours_logged)).collect();
        assert_eq!(
            statuses,
            vec![
                (1, TimesheetStatus::Completed, 40.0),
                (2, TimesheetStatus::Incomplete, 38.0),
                (3, TimesheetStatus::Incomplete, 28.0),
                (4, TimesheetStatus::Completed, 40.0),
                (5, TimesheetStatus::Missing, 0.0),
            ]
        );
        assert_eq!(rows[4].date, "29 January – 2 February, 2024");
    }

    #[test]
    fn test_week_five_has_nothing_logged() {
        let mut dir = TimesheetDirectory::from_seed();
        let view = dir.get_or_default(week(5));
        assert_eq!(view.timesheet.hours_logged, 0.0);
        assert_eq!(view.timesheet.status, TimesheetStatus::Missing);
        assert!(view.tasks.is_empty());
    }

    #[test]
    fn test_get_or_default_vivifies_unknown_week() {
        let mut dir = TimesheetDirectory::from_seed();
        assert!(!dir.contains(week(9)));

        let view = dir.get_or_default(week(9));
        assert_eq!(view.timesheet.id, 6);
        assert_eq!(view.timesheet.status, TimesheetStatus::Missing);
        assert_eq!(view.timesheet.date, derive_date_range(week(9)));
        assert!(view.tasks.is_empty());

        assert!(dir.contains(week(9)));
        assert_eq!(dir.list().len(), 6);
    }

    #[test]
    fn test_get_or_default_is_idempotent() {
        let mut dir = TimesheetDirectory::from_seed();
        let first = dir.get_or_default(week(3));
        let second = dir.get_or_default(week(3));
        assert_eq!(first.timesheet, second.timesheet);
        assert_eq!(first.tasks, second.tasks);
        assert_eq!(dir.list().len(), 5);
    }

    #[test]
    fn test_unknown_week_is_created_once() {
        let mut dir = TimesheetDirectory::from_seed();
        let first = dir.get_or_default(week(12));
        let second = dir.get_or_default(week(12));
        assert_eq!(first.timesheet, second.timesheet);

        let listed = dir.list();
        assert_eq!(listed.len(), 6);
        assert_eq!(listed.iter().filter(|s| s.week == week(12)).count(), 1);
        assert!(matches!(dir.create(week(12)), Err(Error::WeekExists { week: 12 })));
    }

    #[test]
    fn test_save_then_get_round_trip() {
        let mut dir = TimesheetDirectory::from_seed();
        let tasks = tasks_for(week(3), &[8.0, 8.0, 8.0, 8.0, 8.0]);

        let saved = dir.save_tasks(week(3), tasks.clone());
        assert_eq!(saved.hours_logged, 40.0);
        assert_eq!(saved.status, TimesheetStatus::Completed);

        let view = dir.get_or_default(week(3));
        assert_eq!(view.tasks, tasks);
        assert_eq!(view.timesheet.hours_logged, compute_week_hours(&tasks));
        assert_eq!(view.timesheet.status, TimesheetStatus::Completed);
    }

    #[test]
    fn test_save_replaces_instead_of_merging() {
        let mut dir = TimesheetDirectory::from_seed();
        dir.save_tasks(week(1), tasks_for(week(1), &[2.0]));
        let view = dir.get_or_default(week(1));
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.timesheet.hours_logged, 2.0);
        assert_eq!(view.timesheet.status, TimesheetStatus::Incomplete);
    }

    #[test]
    fn test_save_with_emptied_buckets() {
        let mut dir = TimesheetDirectory::from_seed();
        let mut tasks = dir.get_or_default(week(4)).tasks;
        for bucket in tasks.values_mut() {
            bucket.clear();
        }
        let summary = dir.save_tasks(week(4), tasks.clone());
        assert_eq!(summary.status, TimesheetStatus::Missing);
        assert_eq!(dir.get_or_default(week(4)).tasks.len(), tasks.len());
    }

    #[test]
    fn test_save_tasks_vivifies_summary() {
        let mut dir = TimesheetDirectory::new();
        let summary = dir.save_tasks(week(7), tasks_for(week(7), &[3.0, 2.5]));
        assert_eq!(summary.week, week(7));
        assert_eq!(summary.hours_logged, 5.5);
        assert_eq!(summary.status, TimesheetStatus::Incomplete);
        assert_eq!(dir.list(), vec![summary]);
    }

    #[test]
    fn test_save_counts_text_hours_leniently() {
        let mut dir = TimesheetDirectory::new();
        let mut tasks = tasks_for(week(1), &[4.0]);
        let day = week_days(week(1))[1].clone();
        let mut draft = Task::new(day.date);
        draft.hours = Hours::Text("not a number".into());
        tasks.entry(day.key).or_default().push(draft);

        assert_eq!(dir.save_tasks(week(1), tasks).hours_logged, 4.0);
    }

    #[test]
    fn test_create_adds_empty_week() {
        let mut dir = TimesheetDirectory::from_seed();
        let next = dir.next_week().unwrap();
        assert_eq!(next, week(6));

        let created = dir.create(next).unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.status, TimesheetStatus::Missing);
        assert_eq!(created.hours_logged, 0.0);
        assert!(dir.get_or_default(next).tasks.is_empty());
        assert_eq!(dir.next_week().unwrap(), week(7));
    }

    #[test]
    fn test_create_rejects_existing_week() {
        let mut dir = TimesheetDirectory::from_seed();
        let err = dir.create(week(2)).unwrap_err();
        assert!(matches!(err, Error::WeekExists { week: 2 }));
        assert_eq!(dir.list().len(), 5);
    }

    #[test]
    fn test_next_week_on_empty_directory() {
        assert_eq!(TimesheetDirectory::new().next_week().unwrap(), Week::FIRST);
    }
}
