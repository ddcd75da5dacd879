//! Date ranges and human-readable date formatting.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The window of days a run researches events for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DateRange {
    /// First day, inclusive
    start: NaiveDate,
    /// Last day, inclusive
    finish: NaiveDate,
}

impl DateRange {
    /// Creates a range from explicit bounds.
    pub fn new(start: NaiveDate, finish: NaiveDate) -> Self {
        Self { start, finish }
    }

    /// The range from `today` to the same day next month.
    ///
    /// Days past the end of the next month clamp to its last day.
    pub fn month_from(today: NaiveDate) -> Self {
        let finish = today
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self::new(today, finish)
    }
}

/// Formats a date as "October 16th, 2026".
///
/// # Examples
///
/// ```
/// use bulletin_core::long_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
/// assert_eq!(long_date(date), "October 12th, 2026");
/// ```
pub fn long_date(date: NaiveDate) -> String {
    let suffix = match date.day() {
        11..=13 => "th",
        d if d % 10 == 1 => "st",
        d if d % 10 == 2 => "nd",
        d if d % 10 == 3 => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), date.day(), suffix, date.year())
}

/// Formats a date as "10/16/2026".
pub fn american_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}
