//! History command: averages and a per-day log.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use nap_core::history::{format_clock_12h, format_spread, group_days};
use nap_core::time::format_duration;
use nap_core::{DayLog, HistoryStats, Minutes, TimeOfDay};
use nap_db::Database;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    period_days: u32,
    stats: HistoryStats,
    days: &'a [DayLog],
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    today: NaiveDate,
    period_days: u32,
    json: bool,
) -> Result<()> {
    let days = db.history(today, period_days)?;
    let stats = HistoryStats::from_days(&days);

    if json {
        let report = HistoryReport {
            period_days,
            stats,
            days: &days,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if days.is_empty() {
        writeln!(writer, "No days logged in the last {period_days} days.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "History for the last {period_days} days ({} logged)",
        plural(days.len(), "day")
    )?;
    writeln!(
        writer,
        "Wake time:    {}",
        clock(stats.avg_wake_time, stats.wake_time_std_dev)
    )?;
    writeln!(
        writer,
        "Bedtime:      {}",
        clock(stats.avg_bedtime, stats.bedtime_std_dev)
    )?;
    writeln!(
        writer,
        "Naps per day: {}",
        stats
            .avg_naps_per_day
            .map_or_else(|| "n/a".to_string(), |n| format!("{n:.1}"))
    )?;
    writeln!(
        writer,
        "Nap time:     {}",
        stats
            .avg_total_nap_minutes
            .map_or_else(|| "n/a".to_string(), |m| format_duration(whole_minutes(m)))
    )?;

    for (group, members) in group_days(&days, today) {
        writeln!(writer, "\n{group}")?;
        for day in members {
            writeln!(
                writer,
                "  {}  wake {}  {}  {}  bedtime {}",
                day.date,
                time_or_blank(day.wake_time),
                plural(day.naps.len(), "nap"),
                format_duration(day.total_nap_minutes()),
                time_or_blank(day.bedtime)
            )?;
        }
    }

    Ok(())
}

fn clock(avg: Option<f64>, spread: Option<f64>) -> String {
    match (avg, spread) {
        (None, _) => "n/a".to_string(),
        (Some(avg), None) => format_clock_12h(avg),
        (Some(avg), Some(spread)) => {
            format!("{} {}", format_clock_12h(avg), format_spread(spread))
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "average nap totals are well within a day"
)]
fn whole_minutes(minutes: f64) -> Minutes {
    minutes.round() as Minutes
}

fn time_or_blank(time: Option<TimeOfDay>) -> String {
    time.map_or_else(|| "--:--".to_string(), |t| t.to_string())
}

fn plural(count: usize, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
