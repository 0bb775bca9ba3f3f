//! Schedule command: the day's timeline.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use nap_core::time::{format_duration, format_time, format_time_range};
use nap_core::{Event, NapEvent, NapStatus};
use nap_db::Database;

use super::util::day_schedule;
use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let (_day, events) = day_schedule(db, config, date)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&events)?)?;
    } else {
        writeln!(writer, "Schedule for {date}")?;
        write_timeline(writer, &events)?;
    }
    Ok(())
}

/// Writes one aligned line per event.
pub fn write_timeline<W: Write>(writer: &mut W, events: &[Event]) -> Result<()> {
    for event in events {
        let (when, duration, detail) = match event {
            Event::Wake { time, .. } => (format_time(*time), String::new(), String::new()),
            Event::Bedtime { start, .. } => (format_time(*start), String::new(), String::new()),
            Event::Awake { start, end, .. } => (
                format_time_range(*start, *end),
                format_duration(end - start),
                String::new(),
            ),
            Event::Nap(nap) => (
                format_time_range(nap.start, nap.end),
                format_duration(nap.end - nap.start),
                nap_detail(nap),
            ),
        };
        let line = format!("{when:<13}  {:<7}  {duration:<8}  {detail}", event.kind());
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

fn nap_detail(nap: &NapEvent) -> String {
    match &nap.status {
        NapStatus::Predicted { slot_index } => format!("predicted, slot {slot_index}"),
        NapStatus::Actual { actual_data } => format!("logged {}", actual_data.id),
        NapStatus::InProgress { actual_data } => format!("in progress {}", actual_data.id),
    }
}
