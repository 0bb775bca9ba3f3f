//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate, Timelike};
use nap_core::{DayLog, Event, Minutes, NapId, TimeOfDay};
use nap_db::Database;

use crate::Config;

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Minutes since local midnight.
pub fn now_minutes() -> Minutes {
    let seconds = Local::now().time().num_seconds_from_midnight();
    Minutes::try_from(seconds / 60).unwrap_or(0)
}

/// Parse a `--date` argument.
///
/// Supports `YYYY-MM-DD`, `today` and `yesterday`. Missing means `today`.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match input.map(str::trim) {
        None | Some("today") => Ok(today),
        Some("yesterday") => today
            .checked_sub_days(Days::new(1))
            .context("date out of range"),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD, today or yesterday")),
    }
}

/// Parse an `HH:MM` time argument.
pub fn parse_time(input: &str) -> Result<TimeOfDay> {
    input
        .trim()
        .parse()
        .with_context(|| format!("Invalid time: {input}. Use HH:MM"))
}

pub fn parse_nap_id(input: &str) -> Result<NapId> {
    NapId::new(input.trim()).context("invalid nap ID")
}

/// Load a day and generate its timeline with the configured policy.
pub fn day_schedule(
    db: &Database,
    config: &Config,
    date: NaiveDate,
) -> Result<(DayLog, Vec<Event>)> {
    let policy = config
        .schedule
        .policy()
        .context("invalid schedule configuration")?;
    let day = db.load_day(date)?;
    let events = day.schedule(&policy, config.schedule.typical_wake_time)?;
    Ok((day, events))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_keywords() {
        let today = date(2025, 3, 1);
        assert_eq!(parse_date(None, today).unwrap(), today);
        assert_eq!(parse_date(Some("today"), today).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday"), today).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn parse_date_iso() {
        let today = date(2025, 3, 1);
        assert_eq!(
            parse_date(Some("2024-12-31"), today).unwrap(),
            date(2024, 12, 31)
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date(Some("last tuesday"), date(2025, 3, 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn parse_time_accepts_short_hour() {
        assert_eq!(parse_time("7:05").unwrap().minutes(), 425);
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("7pm").is_err());
    }

    #[test]
    fn now_is_within_a_day() {
        assert!((0..24 * 60).contains(&now_minutes()));
    }
}
