//! Day-level logging: wake time, bedtime and skipped slots.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use nap_core::TimeOfDay;
use nap_db::Database;

use super::util::day_schedule;
use crate::Config;

pub fn wake<W: Write>(
    writer: &mut W,
    db: &mut Database,
    date: NaiveDate,
    time: TimeOfDay,
) -> Result<()> {
    db.set_wake_time(date, time)?;
    writeln!(writer, "Woke up at {time} on {date}")?;
    Ok(())
}

pub fn bedtime<W: Write>(
    writer: &mut W,
    db: &mut Database,
    date: NaiveDate,
    time: TimeOfDay,
) -> Result<()> {
    db.set_bedtime(date, time)?;
    writeln!(writer, "Bedtime at {time} on {date}")?;
    Ok(())
}

/// Dismiss a predicted slot. Only slots currently predicted can be skipped.
pub fn skip<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    date: NaiveDate,
    slot_index: usize,
) -> Result<()> {
    let (_day, events) = day_schedule(db, config, date)?;
    let predicted = events
        .iter()
        .filter_map(|event| event.as_nap())
        .any(|nap| nap.slot_index() == Some(slot_index));
    if !predicted {
        bail!("No predicted nap in slot {slot_index} on {date}");
    }

    db.skip_slot(date, slot_index)?;
    writeln!(writer, "Skipped nap slot {slot_index} on {date}")?;
    Ok(())
}
