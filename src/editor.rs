//! Week editing session.
//!
//! The editor holds a working copy of one week's tasks. Each row carries an
//! `editing` flag that lives only here; [`TimesheetEditor::into_week_tasks`]
//! strips it and hands back plain [`Task`] records ready for
//! `save_tasks`. Nothing reaches the backend until the whole week is saved.
//!
//! Rows are addressed by their position in display order (Monday's rows
//! first), starting at 0.

use serde::Serialize;

use crate::aggregate::{WeekDay, compute_week_hours, progress_percent, week_days};
use crate::error::{Error, MISSING_TASK_FIELDS_MESSAGE, Result};
use crate::model::{DayKey, Hours, Task, TimesheetSummary, Week, WeekTasks};

/// A task plus its view-only edit flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub task: Task,
    pub editing: bool,
}

/// One day heading and its rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySlot {
    pub day: WeekDay,
    pub rows: Vec<TaskRow>,
    /// Whether a bucket exists for this day (loaded or added to)
    #[serde(skip)]
    bucket: bool,
}

/// Working copy of one week.
#[derive(Debug, Clone, Serialize)]
pub struct TimesheetEditor {
    pub timesheet: TimesheetSummary,
    pub days: Vec<DaySlot>,
    /// Buckets whose key is not one of the week's working days; kept verbatim
    #[serde(skip)]
    foreign: WeekTasks,
}

impl TimesheetEditor {
    /// Start editing from a fetched summary and its buckets.
    #[must_use]
    pub fn new(timesheet: TimesheetSummary, mut tasks: WeekTasks) -> Self {
        let days = week_days(timesheet.week)
            .into_iter()
            .map(|day| {
                let stored = tasks.remove(&day.key);
                DaySlot {
                    bucket: stored.is_some(),
                    rows: stored
                        .unwrap_or_default()
                        .into_iter()
                        .map(|task| TaskRow {
                            task,
                            editing: false,
                        })
                        .collect(),
                    day,
                }
            })
            .collect();

        Self {
            timesheet,
            days,
            foreign: tasks,
        }
    }

    #[must_use]
    pub const fn week(&self) -> Week {
        self.timesheet.week
    }

    /// Number of rows across all days.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.days.iter().map(|slot| slot.rows.len()).sum()
    }

    /// All rows in display order with their day.
    pub fn rows(&self) -> impl Iterator<Item = (&WeekDay, &TaskRow)> {
        self.days
            .iter()
            .flat_map(|slot| slot.rows.iter().map(move |row| (&slot.day, row)))
    }

    /// Sum of every row's hours, including rows still being edited.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        let rows: f64 = self.rows().map(|(_, row)| row.task.hours.value()).sum();
        rows + compute_week_hours(&self.foreign)
    }

    /// Share of the weekly target reached by [`total_hours`](Self::total_hours).
    #[must_use]
    pub fn progress(&self) -> u32 {
        progress_percent(self.total_hours())
    }

    /// Append an empty row in edit mode to a day and return its position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the day is not part of this week.
    pub fn add_task(&mut self, day: &DayKey) -> Result<usize> {
        let mut offset = 0;
        for slot in &mut self.days {
            if &slot.day.key == day {
                slot.bucket = true;
                slot.rows.push(TaskRow {
                    task: Task::new(slot.day.date),
                    editing: true,
                });
                return Ok(offset + slot.rows.len() - 1);
            }
            offset += slot.rows.len();
        }
        Err(Error::InvalidArgument(format!(
            "day {day} is not part of week {}",
            self.week()
        )))
    }

    /// Replace the description of a row being edited.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown row or one not in edit mode.
    pub fn set_description(&mut self, row: usize, description: &str) -> Result<()> {
        let row = self.editing_row_mut(row)?;
        row.task.description = description.to_string();
        Ok(())
    }

    /// Replace the hours of a row being edited, kept as entered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown row or one not in edit mode.
    pub fn set_hours(&mut self, row: usize, hours: &str) -> Result<()> {
        let row = self.editing_row_mut(row)?;
        row.task.hours = Hours::Text(hours.to_string());
        Ok(())
    }

    /// Leave edit mode for a row once both fields are filled in.
    ///
    /// This is a local step; the week still has to be saved as a whole.
    ///
    /// # Errors
    ///
    /// Returns `RequiredField` if the description or hours are blank, and
    /// `InvalidArgument` for an unknown row.
    pub fn save_row(&mut self, row: usize) -> Result<()> {
        let row = self.row_mut(row)?;
        if row.task.description.trim().is_empty() || !row.task.hours.is_present() {
            return Err(Error::RequiredField {
                field: "task".to_string(),
                message: MISSING_TASK_FIELDS_MESSAGE.to_string(),
            });
        }
        row.editing = false;
        Ok(())
    }

    /// Flip a row in or out of edit mode without validation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown row.
    pub fn toggle_edit(&mut self, row: usize) -> Result<bool> {
        let row = self.row_mut(row)?;
        row.editing = !row.editing;
        Ok(row.editing)
    }

    /// Remove a row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown row.
    pub fn delete(&mut self, row: usize) -> Result<Task> {
        let (slot, index) = self.locate(row)?;
        Ok(self.days[slot].rows.remove(index).task)
    }

    /// Plain buckets for saving: edit flags dropped, hours made numeric.
    #[must_use]
    pub fn to_week_tasks(&self) -> WeekTasks {
        let mut tasks = self.foreign.clone();
        for slot in self.days.iter().filter(|slot| slot.bucket) {
            let bucket = slot
                .rows
                .iter()
                .map(|row| {
                    let mut task = row.task.clone();
                    task.hours = task.hours.normalized();
                    task
                })
                .collect();
            tasks.insert(slot.day.key.clone(), bucket);
        }
        tasks
    }

    /// Consume the editor, see [`to_week_tasks`](Self::to_week_tasks).
    #[must_use]
    pub fn into_week_tasks(self) -> WeekTasks {
        self.to_week_tasks()
    }

    fn locate(&self, row: usize) -> Result<(usize, usize)> {
        let mut remaining = row;
        for (slot_index, slot) in self.days.iter().enumerate() {
            if remaining < slot.rows.len() {
                return Ok((slot_index, remaining));
            }
            remaining -= slot.rows.len();
        }
        Err(Error::InvalidArgument(format!(
            "no task row {row} (this week has {} rows)",
            self.row_count()
        )))
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut TaskRow> {
        let (slot, index) = self.locate(row)?;
        Ok(&mut self.days[slot].rows[index])
    }

    fn editing_row_mut(&mut self, row: usize) -> Result<&mut TaskRow> {
        let task_row = self.row_mut(row)?;
        if task_row.editing {
            Ok(task_row)
        } else {
            Err(Error::InvalidArgument(format!(
                "task row {row} is not being edited; use `edit {row}` first"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::week_span;
    use crate::directory::TimesheetDirectory;

    fn week(n: u32) -> Week {
        Week::new(n).unwrap()
    }

    fn editor_for(n: u32) -> TimesheetEditor {
        let mut directory = TimesheetDirectory::from_seed();
        let view = directory.get_or_default(week(n));
        TimesheetEditor::new(view.timesheet, view.tasks)
    }

    fn monday(editor: &TimesheetEditor) -> DayKey {
        editor.days[0].day.key.clone()
    }

    #[test]
    fn test_loads_seeded_week() {
        let editor = editor_for(1);
        assert_eq!(editor.days.len(), 5);
        assert_eq!(editor.total_hours(), 40.0);
        assert_eq!(editor.progress(), 100);
        assert!(editor.rows().all(|(_, row)| !row.editing));
    }

    #[test]
    fn test_new_row_starts_empty_and_editing() {
        let mut editor = editor_for(5);
        let day = monday(&editor);
        let row = editor.add_task(&day).unwrap();
        assert_eq!(row, 0);

        let (slot_day, task_row) = editor.rows().next().unwrap();
        assert_eq!(slot_day.key, day);
        assert!(task_row.editing);
        assert_eq!(task_row.task.description, "");
        assert!(!task_row.task.hours.is_present());
        assert_eq!(task_row.task.date, editor.days[0].day.date);
    }

    #[test]
    fn test_save_row_requires_both_fields() {
        let mut editor = editor_for(5);
        let day = monday(&editor);
        let row = editor.add_task(&day).unwrap();

        let err = editor.save_row(row).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in task description and hours");

        editor.set_description(row, "Standup").unwrap();
        assert!(editor.save_row(row).is_err());

        editor.set_hours(row, "1.5").unwrap();
        editor.save_row(row).unwrap();
        assert!(!editor.rows().next().unwrap().1.editing);
        assert_eq!(editor.total_hours(), 1.5);
    }

    #[test]
    fn test_fields_locked_outside_edit_mode() {
        let mut editor = editor_for(1);
        assert!(matches!(
            editor.set_hours(0, "3"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(editor.toggle_edit(0).unwrap());
        editor.set_hours(0, "3").unwrap();
        assert!(!editor.toggle_edit(0).unwrap());
    }

    #[test]
    fn test_text_hours_count_leniently() {
        let mut editor = editor_for(5);
        let day = monday(&editor);
        let a = editor.add_task(&day).unwrap();
        let b = editor.add_task(&day).unwrap();
        editor.set_hours(a, "2.5h").unwrap();
        editor.set_hours(b, "abc").unwrap();
        assert_eq!(editor.total_hours(), 2.5);
        assert_eq!(editor.progress(), 6);
    }

    #[test]
    fn test_delete_and_bad_rows() {
        let mut editor = editor_for(2);
        let before = editor.row_count();
        let removed = editor.delete(0).unwrap();
        assert_eq!(editor.row_count(), before - 1);
        assert!(editor.rows().all(|(_, row)| row.task.id != removed.id));

        assert!(editor.delete(99).is_err());
        assert!(editor.add_task(&DayKey::from_raw("sat-6")).is_err());
    }

    #[test]
    fn test_week_tasks_drop_flags_and_normalize_hours() {
        let mut editor = editor_for(5);
        let day = monday(&editor);
        let row = editor.add_task(&day).unwrap();
        editor.set_description(row, "Planning").unwrap();
        editor.set_hours(row, "4").unwrap();

        let tasks = editor.into_week_tasks();
        assert_eq!(tasks.len(), 1);
        let saved = &tasks[&day][0];
        assert_eq!(saved.hours, Hours::Number(4.0));
        assert_eq!(compute_week_hours(&tasks), 4.0);
    }

    #[test]
    fn test_untouched_week_round_trips() {
        let mut directory = TimesheetDirectory::from_seed();
        let view = directory.get_or_default(week(3));
        let editor = TimesheetEditor::new(view.timesheet, view.tasks.clone());
        assert_eq!(editor.to_week_tasks(), view.tasks);
    }

    #[test]
    fn test_foreign_buckets_are_preserved() {
        let mut directory = TimesheetDirectory::from_seed();
        let view = directory.get_or_default(week(5));
        let mut tasks = WeekTasks::new();
        let stray = Task::new(week_span(week(5)).start)
            .with_description("weekend")
            .with_hours(2.0);
        tasks.insert(DayKey::from_raw("sat-3"), vec![stray]);

        let editor = TimesheetEditor::new(view.timesheet, tasks.clone());
        assert_eq!(editor.row_count(), 0);
        assert_eq!(editor.total_hours(), 2.0);
        assert_eq!(editor.to_week_tasks(), tasks);
    }
}
