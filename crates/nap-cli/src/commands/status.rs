//! Status command for showing configuration and today's log.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use nap_core::age::{age_in_months, format_age};
use nap_core::time::format_duration;
use nap_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    let policy = config
        .schedule
        .policy()
        .context("invalid schedule configuration")?;

    writeln!(writer, "Nap planner status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    let age = config
        .baby
        .birthday
        .map(|birthday| format_age(age_in_months(birthday, today)));
    match (&config.baby.name, age) {
        (Some(name), Some(age)) => writeln!(writer, "Baby: {name}, {age}")?,
        (Some(name), None) => writeln!(writer, "Baby: {name}")?,
        (None, Some(age)) => writeln!(writer, "Baby: {age}")?,
        (None, None) => {}
    }

    writeln!(
        writer,
        "Wake window: {}",
        format_duration(policy.wake_window_minutes())
    )?;
    writeln!(
        writer,
        "Nap length: {}",
        format_duration(policy.nap_duration_minutes())
    )?;
    writeln!(
        writer,
        "Typical wake time: {}",
        config.schedule.typical_wake_time
    )?;
    writeln!(writer, "Bedtime: {}", policy.bedtime)?;

    let day = db.load_day(today)?;
    if day.has_activity() {
        let wake = day
            .wake_time
            .map_or_else(|| "not logged".to_string(), |t| t.to_string());
        writeln!(
            writer,
            "Today: woke {wake}, {} logged",
            match day.naps.len() {
                1 => "1 nap".to_string(),
                n => format!("{n} naps"),
            }
        )?;
    } else {
        writeln!(writer, "Today: nothing logged yet")?;
    }

    Ok(())
}
