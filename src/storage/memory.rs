//! Plain in-memory store for summaries and task buckets.
//!
//! The store holds data and nothing else. Keeping summaries consistent with
//! their tasks is the directory's job.

use std::collections::HashMap;

use crate::model::{TimesheetSummary, Week, WeekTasks};

/// Summaries in creation order plus the task buckets of every week.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    summaries: Vec<TimesheetSummary>,
    tasks: HashMap<Week, WeekTasks>,
}

impl TaskStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All summaries, in the order they were added.
    #[must_use]
    pub fn summaries(&self) -> &[TimesheetSummary] {
        &self.summaries
    }

    pub fn summaries_mut(&mut self) -> &mut [TimesheetSummary] {
        &mut self.summaries
    }

    #[must_use]
    pub fn summary(&self, week: Week) -> Option<&TimesheetSummary> {
        self.summaries.iter().find(|s| s.week == week)
    }

    pub fn summary_mut(&mut self, week: Week) -> Option<&mut TimesheetSummary> {
        self.summaries.iter_mut().find(|s| s.week == week)
    }

    /// Append a summary. Uniqueness of `week` is checked by the caller.
    pub fn push_summary(&mut self, summary: TimesheetSummary) {
        self.summaries.push(summary);
    }

    /// Identifier for the next summary: one past the current count.
    #[must_use]
    pub fn next_summary_id(&self) -> u64 {
        self.summaries.len() as u64 + 1
    }

    /// Buckets recorded for a week, if any were ever saved.
    #[must_use]
    pub fn week_tasks(&self, week: Week) -> Option<&WeekTasks> {
        self.tasks.get(&week)
    }

    /// Replace a week's buckets wholesale, returning the previous ones.
    pub fn replace_week_tasks(&mut self, week: Week, tasks: WeekTasks) -> Option<WeekTasks> {
        self.tasks.insert(week, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayKey, Task};

    fn week(n: u32) -> Week {
        Week::new(n).unwrap()
    }

    #[test]
    fn test_summary_ids_follow_count() {
        let mut store = TaskStore::new();
        assert_eq!(store.next_summary_id(), 1);
        store.push_summary(TimesheetSummary::new(1, week(3)));
        assert_eq!(store.next_summary_id(), 2);
        assert!(store.summary(week(3)).is_some());
        assert!(store.summary(week(4)).is_none());
    }

    #[test]
    fn test_replace_week_tasks_is_wholesale() {
        let mut store = TaskStore::new();
        let day = crate::aggregate::EPOCH;

        let mut first = WeekTasks::new();
        first.insert(DayKey::for_date(day), vec![Task::new(day).with_hours(4.0)]);
        assert!(store.replace_week_tasks(week(1), first.clone()).is_none());

        let second = WeekTasks::new();
        let previous = store.replace_week_tasks(week(1), second);
        assert_eq!(previous, Some(first));
        assert!(store.week_tasks(week(1)).unwrap().is_empty());
    }
}
