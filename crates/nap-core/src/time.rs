//! Time-of-day arithmetic on minutes since midnight.
//!
//! Generation works on plain `i32` minute counts and never wraps them; a nap
//! ending at 24:30 is simply `1470`. Wrapping modulo one day happens only
//! when a value is formatted for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ValidationError;

/// Minutes since midnight. May exceed one day or go negative during arithmetic.
pub type Minutes = i32;

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Errors from parsing an `HH:MM` time-of-day string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// The string is not of the form `H:MM` or `HH:MM`.
    #[error("invalid time {input:?}, expected HH:MM")]
    Format { input: String },

    /// Hour component outside 0..=23.
    #[error("hour out of range in {input:?}: {hour}")]
    HourOutOfRange { input: String, hour: Minutes },

    /// Minute component outside 0..=59.
    #[error("minute out of range in {input:?}: {minute}")]
    MinuteOutOfRange { input: String, minute: Minutes },
}

/// Parses `HH:MM` into minutes since midnight.
///
/// Exact inverse of [`format_time`] for values in `0..1440`.
pub fn parse_time(input: &str) -> Result<Minutes, TimeParseError> {
    let format_err = || TimeParseError::Format {
        input: input.to_string(),
    };

    let (hours, minutes) = input.trim().split_once(':').ok_or_else(format_err)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return Err(format_err());
    }

    let hour: Minutes = hours.parse().map_err(|_| format_err())?;
    let minute: Minutes = minutes.parse().map_err(|_| format_err())?;
    if hour > 23 {
        return Err(TimeParseError::HourOutOfRange {
            input: input.to_string(),
            hour,
        });
    }
    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange {
            input: input.to_string(),
            minute,
        });
    }

    Ok(hour * 60 + minute)
}

/// Formats minutes since midnight as zero-padded `HH:MM`.
///
/// Values outside a single day wrap, so `1470` renders as `00:30` and `-30`
/// as `23:30`.
pub fn format_time(minutes: Minutes) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Formats an interval as `HH:MM–HH:MM`.
pub fn format_time_range(start: Minutes, end: Minutes) -> String {
    format!("{}–{}", format_time(start), format_time(end))
}

/// Converts fractional hours to whole minutes, rounding to the nearest minute.
#[expect(
    clippy::cast_possible_truncation,
    reason = "policy durations are validated to a few hours"
)]
pub fn hours_to_minutes(hours: f64) -> Minutes {
    (hours * 60.0).round() as Minutes
}

/// Adds a number of hours to a minute value without wrapping.
pub fn add_hours(minutes: Minutes, hours: f64) -> Minutes {
    minutes + hours_to_minutes(hours)
}

/// Rounds to the nearest multiple of five minutes, ties rounding up.
#[expect(
    clippy::cast_possible_truncation,
    reason = "inputs are drag offsets within a single day"
)]
pub fn round_to_nearest_5(minutes: f64) -> Minutes {
    ((minutes / 5.0 + 0.5).floor() * 5.0) as Minutes
}

/// Formats a duration for display: `45 min`, `1h`, `1h 30m`.
pub fn format_duration(minutes: Minutes) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// A validated time of day in `00:00..=23:59`.
///
/// Serializes as an `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(Minutes);

impl TimeOfDay {
    /// Creates a time of day from minutes since midnight.
    pub const fn new(minutes: Minutes) -> Result<Self, ValidationError> {
        if minutes < 0 || minutes >= MINUTES_PER_DAY {
            return Err(ValidationError::MinuteOutOfRange { minutes });
        }
        Ok(Self(minutes))
    }

    /// Returns minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> Minutes {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.0))
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s).map(Self)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl From<TimeOfDay> for Minutes {
    fn from(time: TimeOfDay) -> Self {
        time.0
    }
}
