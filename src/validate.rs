//! Input normalization for the terminal front end.
//!
//! Days can be typed the way people say them. Resolution is tiered:
//! exact day key → weekday name or alias → position in the week → error
//! with the closest suggestion.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::aggregate::WeekDay;
use crate::error::{Error, Result};
use crate::model::DayKey;

// ── Weekday aliases ──────────────────────────────────────────

/// Spellings accepted for each working day, mapped to the `%a` abbreviation.
pub static DAY_ALIASES: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("mon", "mon"),
        ("monday", "mon"),
        ("mo", "mon"),
        ("tue", "tue"),
        ("tues", "tue"),
        ("tuesday", "tue"),
        ("tu", "tue"),
        ("wed", "wed"),
        ("weds", "wed"),
        ("wednesday", "wed"),
        ("we", "wed"),
        ("thu", "thu"),
        ("thur", "thu"),
        ("thurs", "thu"),
        ("thursday", "thu"),
        ("th", "thu"),
        ("fri", "fri"),
        ("friday", "fri"),
        ("fr", "fri"),
    ]
    .into_iter()
    .collect()
});

/// Resolve user input to one of the week's day keys.
///
/// Accepts `mon-1`, `mon`, `Monday`, or a 1-based position (`1`-`5`).
///
/// # Errors
///
/// Returns `InvalidArgument` naming the closest match when nothing fits.
pub fn normalize_day(input: &str, days: &[WeekDay]) -> Result<DayKey> {
    let lower = input.trim().to_lowercase();

    // Tier 1: exact key
    if let Some(day) = days.iter().find(|d| d.key.as_str() == lower) {
        return Ok(day.key.clone());
    }

    // Tier 2: weekday name or alias
    if let Some(&abbrev) = DAY_ALIASES.get(lower.as_str()) {
        if let Some(day) = days.iter().find(|d| weekday_of(&d.key) == abbrev) {
            return Ok(day.key.clone());
        }
    }

    // Tier 3: position
    if let Ok(n) = lower.parse::<usize>() {
        if let Some(day) = n.checked_sub(1).and_then(|i| days.get(i)) {
            return Ok(day.key.clone());
        }
    }

    let suggestion = find_closest_day(&lower)
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default();
    Err(Error::InvalidArgument(format!(
        "unknown day '{input}'{suggestion}"
    )))
}

fn weekday_of(key: &DayKey) -> &str {
    key.as_str().split('-').next().unwrap_or_default()
}

fn find_closest_day(input: &str) -> Option<&'static str> {
    DAY_ALIASES
        .iter()
        .map(|(&alias, &abbrev)| (levenshtein_distance(input, alias), abbrev))
        .filter(|(dist, _)| *dist <= 2)
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, abbrev)| abbrev)
}

/// Convert a 1-based row number typed by the user to an editor position.
///
/// # Errors
///
/// Returns `InvalidArgument` for anything that is not a positive integer.
pub fn parse_row(input: &str) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(Error::InvalidArgument(format!(
            "row must be a positive number, got '{input}'"
        ))),
    }
}

/// Presence check for a form field.
///
/// # Errors
///
/// Returns `RequiredField` when the value is blank.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::required(field))
    } else {
        Ok(())
    }
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::week_days;
    use crate::model::Week;

    fn days() -> Vec<WeekDay> {
        week_days(Week::FIRST)
    }

    #[test]
    fn test_normalize_day_tiers() {
        let days = days();
        assert_eq!(normalize_day("mon-1", &days).unwrap().as_str(), "mon-1");
        assert_eq!(normalize_day("Tuesday", &days).unwrap().as_str(), "tue-2");
        assert_eq!(normalize_day("thurs", &days).unwrap().as_str(), "thu-4");
        assert_eq!(normalize_day(" 5 ", &days).unwrap().as_str(), "fri-5");
    }

    #[test]
    fn test_normalize_day_follows_the_week() {
        let days = week_days(Week::new(5).unwrap());
        assert_eq!(normalize_day("fri", &days).unwrap().as_str(), "fri-2");
        assert_eq!(normalize_day("1", &days).unwrap().as_str(), "mon-29");
    }

    #[test]
    fn test_normalize_day_rejects_with_suggestion() {
        let days = days();
        let err = normalize_day("wednsday", &days).unwrap_err();
        assert!(err.to_string().contains("did you mean 'wed'"));
        assert!(normalize_day("0", &days).is_err());
        assert!(normalize_day("6", &days).is_err());
        assert!(normalize_day("saturday", &days).is_err());
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(parse_row("1").unwrap(), 0);
        assert_eq!(parse_row("12").unwrap(), 11);
        assert!(parse_row("0").is_err());
        assert!(parse_row("-1").is_err());
        assert!(parse_row("x").is_err());
    }

    #[test]
    fn test_require() {
        assert!(require("email", "a@b.c").is_ok());
        assert!(matches!(
            require("email", "   "),
            Err(Error::RequiredField { .. })
        ));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
