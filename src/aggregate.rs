//! Aggregation of logged hours and derivation of week metadata.
//!
//! Everything here is a pure function. Hours are read leniently: a value
//! that does not begin with a number counts as zero instead of failing, so
//! a half-typed row never blocks a save or a dashboard refresh.
//!
//! Week numbers map linearly onto calendar dates: week 1 starts Monday
//! 1 January 2024, each week starts seven days after the previous one and
//! covers five working days. Both the dashboard date range and the per-day
//! buckets of the week page come from [`week_span`].

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::{DayKey, TimesheetStatus, Week, WeekTasks};

/// Hours needed for a week to count as completed.
pub const TARGET_WEEKLY_HOURS: f64 = 40.0;

/// Working days shown per week (Monday to Friday).
pub const DAYS_PER_WEEK: u64 = 5;

/// Monday of week 1.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid epoch"),
};

/// Parse an hours value the way a browser number field would.
///
/// Leading whitespace is skipped and the longest numeric prefix is used
/// (`"7.5h"` → 7.5). No prefix, a non-finite result or a negative value
/// all yield 0.
#[must_use]
pub fn parse_hours(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return 0.0;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v.max(0.0))
}

/// Total hours logged across every bucket of a week.
///
/// No rounding is applied; the result may be fractional.
#[must_use]
pub fn compute_week_hours(tasks: &WeekTasks) -> f64 {
    tasks.values().flatten().map(|task| task.hours.value()).sum()
}

/// Map a weekly total onto a status.
///
/// 40 or more is completed, anything above zero is incomplete, zero (or
/// less) is missing.
#[must_use]
pub fn derive_status(total_hours: f64) -> TimesheetStatus {
    if total_hours >= TARGET_WEEKLY_HOURS {
        TimesheetStatus::Completed
    } else if total_hours > 0.0 {
        TimesheetStatus::Incomplete
    } else {
        TimesheetStatus::Missing
    }
}

/// First and last working day of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Calendar span of a week: Monday through Friday.
#[must_use]
pub fn week_span(week: Week) -> WeekSpan {
    let offset = u64::from(week.get() - 1) * 7;
    let start = EPOCH.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX);
    let end = start
        .checked_add_days(Days::new(DAYS_PER_WEEK - 1))
        .unwrap_or(NaiveDate::MAX);
    WeekSpan { start, end }
}

/// Human-readable range for a week, e.g. `1 – 5 January, 2024`.
///
/// The month is only repeated when the span crosses a month boundary, and
/// the year only when it crosses a year boundary.
#[must_use]
pub fn derive_date_range(week: Week) -> String {
    let WeekSpan { start, end } = week_span(week);
    let end_str = end.format("%-d %B, %Y");

    if start.year() != end.year() {
        format!("{} – {end_str}", start.format("%-d %B, %Y"))
    } else if start.month() != end.month() {
        format!("{} – {end_str}", start.format("%-d %B"))
    } else {
        format!("{} – {end_str}", start.day())
    }
}

/// One working day of a week, as shown on the week page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    /// Bucket key, e.g. `mon-1`
    pub key: DayKey,
    /// Heading, e.g. `Mon, Jan 1`
    pub display: String,
    pub date: NaiveDate,
}

/// The five working days of a week, Monday first.
#[must_use]
pub fn week_days(week: Week) -> Vec<WeekDay> {
    let span = week_span(week);
    span.start
        .iter_days()
        .take_while(|date| *date <= span.end)
        .map(|date| WeekDay {
            key: DayKey::for_date(date),
            display: date.format("%a, %b %-d").to_string(),
            date,
        })
        .collect()
}

/// Share of the weekly target reached, as a whole percentage.
///
/// Not capped; callers drawing a bar clamp it to 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(total_hours: f64) -> u32 {
    let pct = (total_hours / TARGET_WEEKLY_HOURS * 100.0).round();
    if pct.is_finite() && pct > 0.0 {
        pct.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hours, Task};

    fn week(n: u32) -> Week {
        Week::new(n).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(day: NaiveDate, hours: Hours) -> Task {
        let mut t = Task::new(day).with_description("work");
        t.hours = hours;
        t
    }

    #[test]
    fn test_parse_hours_prefix_semantics() {
        assert_eq!(parse_hours("8"), 8.0);
        assert_eq!(parse_hours("  7.5"), 7.5);
        assert_eq!(parse_hours("7.5h"), 7.5);
        assert_eq!(parse_hours(".5"), 0.5);
        assert_eq!(parse_hours("5."), 5.0);
        assert_eq!(parse_hours("1e1"), 10.0);
        assert_eq!(parse_hours("2e"), 2.0);
        assert_eq!(parse_hours(""), 0.0);
        assert_eq!(parse_hours("abc"), 0.0);
        assert_eq!(parse_hours("."), 0.0);
        assert_eq!(parse_hours("-"), 0.0);
        assert_eq!(parse_hours("-3"), 0.0);
        assert_eq!(parse_hours("1e400"), 0.0);
    }

    #[test]
    fn test_compute_week_hours_sums_all_buckets() {
        let mut tasks = WeekTasks::new();
        tasks.insert(
            DayKey::from_raw("mon-1"),
            vec![
                task(date(2024, 1, 1), Hours::Number(4.0)),
                task(date(2024, 1, 1), Hours::Text("3.5".into())),
            ],
        );
        tasks.insert(
            DayKey::from_raw("tue-2"),
            vec![
                task(date(2024, 1, 2), Hours::Text("oops".into())),
                task(date(2024, 1, 2), Hours::Text(String::new())),
                task(date(2024, 1, 2), Hours::Number(0.25)),
            ],
        );
        tasks.insert(DayKey::from_raw("wed-3"), Vec::new());

        assert_eq!(compute_week_hours(&tasks), 7.75);
    }

    #[test]
    fn test_compute_week_hours_ignores_key_order() {
        let entries = [
            ("fri-5", 8.0),
            ("mon-1", 4.0),
            ("wed-3", 6.5),
            ("thu-4", 1.5),
        ];
        let forward: WeekTasks = entries
            .iter()
            .map(|(k, h)| (DayKey::from_raw(k), vec![task(EPOCH, Hours::Number(*h))]))
            .collect();
        let backward: WeekTasks = entries
            .iter()
            .rev()
            .map(|(k, h)| (DayKey::from_raw(k), vec![task(EPOCH, Hours::Number(*h))]))
            .collect();

        assert_eq!(compute_week_hours(&forward), 20.0);
        assert_eq!(compute_week_hours(&forward), compute_week_hours(&backward));
    }

    #[test]
    fn test_compute_week_hours_empty() {
        assert_eq!(compute_week_hours(&WeekTasks::new()), 0.0);
    }

    #[test]
    fn test_derive_status_boundaries() {
        assert_eq!(derive_status(0.0), TimesheetStatus::Missing);
        assert_eq!(derive_status(-1.0), TimesheetStatus::Missing);
        assert_eq!(derive_status(0.01), TimesheetStatus::Incomplete);
        assert_eq!(derive_status(39.99), TimesheetStatus::Incomplete);
        assert_eq!(derive_status(40.0), TimesheetStatus::Completed);
        assert_eq!(derive_status(40.01), TimesheetStatus::Completed);
    }

    #[test]
    fn test_week_span_linear_mapping() {
        assert_eq!(
            week_span(week(1)),
            WeekSpan { start: date(2024, 1, 1), end: date(2024, 1, 5) }
        );
        for w in 1..200 {
            let this = week_span(week(w));
            let next = week_span(week(w + 1));
            assert_eq!(next.start - this.start, chrono::Duration::days(7));
            assert_eq!(this.end - this.start, chrono::Duration::days(4));
            assert_eq!(this.start.weekday(), chrono::Weekday::Mon);
        }
    }

    #[test]
    fn test_derive_date_range_formats() {
        assert_eq!(derive_date_range(week(1)), "1 – 5 January, 2024");
        assert_eq!(derive_date_range(week(2)), "8 – 12 January, 2024");
        assert_eq!(derive_date_range(week(5)), "29 January – 2 February, 2024");
        assert_eq!(derive_date_range(week(53)), "30 December, 2024 – 3 January, 2025");
    }

    #[test]
    fn test_week_days_match_span() {
        let days = week_days(week(2));
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].key.as_str(), "mon-8");
        assert_eq!(days[0].display, "Mon, Jan 8");
        assert_eq!(days[4].key.as_str(), "fri-12");
        assert_eq!(days[4].date, week_span(week(2)).end);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(20.0), 50);
        assert_eq!(progress_percent(42.0), 105);
        assert_eq!(progress_percent(13.0), 33);
    }
}
