//! Timesheet commands: list, show, create.

use colored::Colorize;
use serde::Serialize;

use super::{App, runtime};
use crate::api::TimesheetApi;
use crate::cli::render;
use crate::editor::TimesheetEditor;
use crate::error::Result;
use crate::model::Week;
use crate::session::Route;

/// Week page payload for `--json`.
#[derive(Serialize)]
pub struct WeekOutput<'a> {
    #[serde(flatten)]
    pub editor: &'a TimesheetEditor,
    pub total_hours: f64,
    pub progress: u32,
}

impl<'a> WeekOutput<'a> {
    #[must_use]
    pub fn new(editor: &'a TimesheetEditor) -> Self {
        Self {
            editor,
            total_hours: editor.total_hours(),
            progress: editor.progress(),
        }
    }
}

/// Show the dashboard.
///
/// # Errors
///
/// Returns `NotAuthenticated` when signed out, or the backend error.
pub fn execute_list(app: &App, json: bool) -> Result<()> {
    app.guard(Route::Dashboard)?;
    let rt = runtime()?;
    let list = rt.block_on(app.api.list_timesheets())?;

    if json {
        println!("{}", serde_json::to_string(&list)?);
    } else {
        render::dashboard(app.gate.user(), &list.timesheets);
    }
    Ok(())
}

/// Show one week, read-only.
///
/// # Errors
///
/// Returns `InvalidWeek` for a bad week number, `NotAuthenticated` when
/// signed out, or the backend error.
pub fn execute_show(app: &App, week: &str, json: bool) -> Result<()> {
    let week: Week = week.parse()?;
    show_week(app, week, json)
}

pub(crate) fn show_week(app: &App, week: Week, json: bool) -> Result<()> {
    app.guard(Route::Timesheet(week))?;
    let rt = runtime()?;
    let detail = rt.block_on(app.api.get_timesheet(week))?;
    let editor = TimesheetEditor::new(detail.timesheet, detail.tasks);

    if json {
        println!("{}", serde_json::to_string(&WeekOutput::new(&editor))?);
    } else {
        render::week_page(&editor);
    }
    Ok(())
}

/// Add an empty week, by default the one after the latest.
///
/// # Errors
///
/// Returns `WeekExists` if the week is already listed, `InvalidWeek` for a
/// bad number, `NotAuthenticated` when signed out, or the backend error.
pub fn execute_create(app: &App, week: Option<&str>, json: bool) -> Result<()> {
    app.guard(Route::Dashboard)?;
    let rt = runtime()?;
    let week = match week {
        Some(raw) => raw.parse()?,
        None => rt.block_on(app.api.next_week())?,
    };
    let created = rt.block_on(app.api.create_timesheet(week))?;

    if json {
        println!("{}", serde_json::to_string(&created)?);
    } else {
        let sheet = &created.timesheet;
        println!(
            "{} Created week {} timesheet {}",
            "✓".green(),
            sheet.week,
            format!("({})", sheet.date).dimmed()
        );
    }
    Ok(())
}
