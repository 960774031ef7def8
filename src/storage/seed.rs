//! Demo data: the first five weeks of 2024.
//!
//! Weeks 1–4 carry tasks on every working day; week 5 exists on the
//! dashboard but has nothing logged yet.

use tracing::debug;

use super::TaskStore;
use crate::aggregate::week_days;
use crate::model::{Task, TimesheetSummary, Week, WeekTasks};

/// (weekday index 0..5, description, hours) per seeded week.
const SEED_WEEKS: &[&[(usize, &str, f64)]] = &[
    &[
        (0, "A", 4.0),
        (0, "B", 4.0),
        (1, "C", 8.0),
        (2, "D", 8.0),
        (3, "E", 8.0),
        (4, "F", 8.0),
    ],
    &[
        (0, "A", 8.0),
        (1, "B", 6.0),
        (2, "C", 2.0),
        (2, "D", 6.0),
        (3, "E", 8.0),
        (4, "F", 8.0),
    ],
    &[
        (0, "A", 4.0),
        (1, "B", 6.0),
        (2, "C", 8.0),
        (3, "D", 4.0),
        (4, "E", 6.0),
    ],
    &[
        (0, "A", 8.0),
        (1, "B", 8.0),
        (2, "C", 8.0),
        (3, "D", 8.0),
        (4, "E", 8.0),
    ],
    &[],
];

/// Build a store holding the demo weeks.
///
/// Summaries start out as fresh `missing` rows; the directory reconciles
/// them against the tasks on first read.
#[must_use]
pub fn seeded_store() -> TaskStore {
    let mut store = TaskStore::new();

    for (n, entries) in (1u32..).zip(SEED_WEEKS) {
        let Ok(week) = Week::new(n) else { continue };
        let days = week_days(week);
        let mut tasks = WeekTasks::new();

        for &(day_index, description, hours) in *entries {
            let Some(day) = days.get(day_index) else { continue };
            let task = Task::new(day.date).with_description(description).with_hours(hours);
            tasks.entry(task.day_key()).or_default().push(task);
        }

        store.push_summary(TimesheetSummary::new(store.next_summary_id(), week));
        store.replace_week_tasks(week, tasks);
    }

    debug!(weeks = store.summaries().len(), "Seeded demo timesheets");
    store
}
