//! Upcoming-birthday arithmetic over `DD-MM-YYYY` strings.
//!
//! Birthdays are stored as plain strings, so every comparison parses the
//! value, moves it to the year of "today" and measures the distance in
//! calendar days.

use chrono::{Datelike, NaiveDate};

use crate::constants::{BIRTHDAY_FORMAT, DEFAULT_BIRTHDAY_WINDOW_DAYS, MAX_BIRTHDAY_WINDOW_DAYS};
use crate::error::{BirthdayError, ValidationError};

/// Parse a `DD-MM-YYYY` birthday.
pub fn parse_birthday(raw: &str) -> Result<NaiveDate, BirthdayError> {
    NaiveDate::parse_from_str(raw.trim(), BIRTHDAY_FORMAT)
        .map_err(|_| BirthdayError::Format(raw.to_string()))
}

/// Move a date to `year`. February 29 lands on February 28 in non-leap years.
pub fn reanchor(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

/// Calendar days from `today` to the next occurrence of `birthday`.
///
/// Returns 0 when the birthday is today. An anniversary already past this
/// year is measured against next year's.
pub fn days_until(birthday: NaiveDate, today: NaiveDate) -> i64 {
    let mut next = reanchor(birthday, today.year());
    if next < today {
        next = reanchor(birthday, today.year() + 1);
    }
    (next - today).num_days()
}

/// A forward window of `days` calendar days starting tomorrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    today: NaiveDate,
    days: u32,
}

impl BirthdayWindow {
    pub fn new(today: NaiveDate, days: u32) -> Result<Self, ValidationError> {
        if days == 0 || days > MAX_BIRTHDAY_WINDOW_DAYS {
            return Err(ValidationError::WindowDays {
                got: days,
                max: MAX_BIRTHDAY_WINDOW_DAYS,
            });
        }
        Ok(Self { today, days })
    }

    /// The default seven-day window.
    pub fn week_from(today: NaiveDate) -> Self {
        Self {
            today,
            days: DEFAULT_BIRTHDAY_WINDOW_DAYS,
        }
    }

    /// Whether a raw birthday falls 1..=days calendar days after today.
    ///
    /// `None` (no birthday on file) is never included.
    pub fn includes(&self, birthday: Option<&str>) -> Result<bool, BirthdayError> {
        let Some(raw) = birthday.filter(|b| !b.trim().is_empty()) else {
            return Ok(false);
        };
        let date = parse_birthday(raw)?;
        let n = days_until(date, self.today);
        Ok(n >= 1 && n <= i64::from(self.days))
    }
}
