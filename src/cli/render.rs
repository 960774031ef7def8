//! Human-readable pages for the terminal.

use colored::Colorize;

use crate::aggregate::TARGET_WEEKLY_HOURS;
use crate::editor::TimesheetEditor;
use crate::error::Error;
use crate::model::{TimesheetStatus, TimesheetSummary, UserProfile};

const BAR_WIDTH: usize = 20;

fn status_badge(status: TimesheetStatus) -> String {
    let label = status.as_str().to_uppercase();
    match status {
        TimesheetStatus::Completed => label.green().to_string(),
        TimesheetStatus::Incomplete => label.yellow().to_string(),
        TimesheetStatus::Missing => label.red().to_string(),
    }
}

/// Hours without a trailing `.0`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        let s = format!("{hours:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Filled progress bar, capped at the weekly target.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn progress_bar(percent: u32) -> String {
    let filled = ((percent.min(100) as usize) * BAR_WIDTH).div_ceil(100);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// The dashboard table.
pub fn dashboard(user: Option<&UserProfile>, timesheets: &[TimesheetSummary]) {
    if let Some(user) = user {
        println!("{} {}", "Your Timesheets".bold(), format!("({})", user.name).dimmed());
    } else {
        println!("{}", "Your Timesheets".bold());
    }
    println!();

    if timesheets.is_empty() {
        println!("No timesheets yet. Create one with: tt create");
        return;
    }

    println!(
        "{:>6}  {:<38}  {:<10}  {:>7}  {}",
        "WEEK #".dimmed(),
        "DATE".dimmed(),
        "STATUS".dimmed(),
        "HOURS".dimmed(),
        "ACTIONS".dimmed()
    );
    for sheet in timesheets {
        println!(
            "{:>6}  {:<38}  {:<10}  {:>7}  {}",
            sheet.week,
            sheet.date,
            status_badge(sheet.status),
            format_hours(sheet.hours_logged),
            sheet.status.action_label().cyan()
        );
    }
}

/// One week's page: heading, progress, then each day's rows numbered from 1.
pub fn week_page(editor: &TimesheetEditor) {
    let total = editor.total_hours();
    let percent = editor.progress();

    println!(
        "{}  {}",
        format!("Week {} Timesheet", editor.week()).bold(),
        editor.timesheet.date.dimmed()
    );
    println!(
        "{} {}/{} hrs  {}%",
        progress_bar(percent).yellow(),
        format_hours(total),
        format_hours(TARGET_WEEKLY_HOURS),
        percent
    );

    let mut number = 0;
    for slot in &editor.days {
        println!();
        println!("{}", slot.day.display.bold());
        if slot.rows.is_empty() {
            println!("    {}", "(no tasks)".dimmed());
        }
        for row in &slot.rows {
            number += 1;
            let marker = if row.editing { "*" } else { " " };
            let description = if row.task.description.is_empty() {
                "(no description)".dimmed().to_string()
            } else {
                row.task.description.clone()
            };
            println!(
                "  {:>2}{} {:<48} {} hrs",
                number,
                marker.yellow(),
                description,
                row.task.hours
            );
        }
    }
}

/// Human form of an error, with its hint when there is one.
pub fn error(e: &Error) {
    if let Some(hint) = e.hint() {
        eprintln!("Error: {e}\n  Hint: {hint}");
    } else {
        eprintln!("Error: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(40.0), "40");
        assert_eq!(format_hours(7.5), "7.5");
        assert_eq!(format_hours(0.25), "0.25");
        assert_eq!(format_hours(0.0), "0");
    }

    #[test]
    fn test_progress_bar_caps_at_full() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(250), progress_bar(100));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
    }
}
