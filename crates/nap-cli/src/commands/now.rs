//! Now command: where the day stands at the current time.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use nap_core::time::{format_duration, format_time, format_time_range};
use nap_core::{Event, Minutes, current_event};
use nap_db::Database;
use serde::Serialize;

use super::util::day_schedule;
use crate::Config;

#[derive(Debug, Serialize)]
struct NowReport<'a> {
    date: NaiveDate,
    time: Minutes,
    current: Option<&'a Event>,
    next: Option<&'a Event>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    date: NaiveDate,
    minutes: Minutes,
    json: bool,
) -> Result<()> {
    let (_day, events) = day_schedule(db, config, date)?;
    let current = current_event(&events, minutes);
    let next = events
        .iter()
        .find(|event| event.as_nap().is_some() && event.start() > minutes);

    if json {
        let report = NowReport {
            date,
            time: minutes,
            current,
            next,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", describe_current(current, minutes))?;
    if let Some(next) = next {
        writeln!(
            writer,
            "Next nap: {} (in {})",
            format_time_range(next.start(), next.end()),
            format_duration(next.start() - minutes)
        )?;
    }
    Ok(())
}

fn describe_current(current: Option<&Event>, minutes: Minutes) -> String {
    let now = format_time(minutes);
    let Some(event) = current else {
        return format!("{now}: nothing scheduled");
    };
    let remaining = format_duration(event.end() - minutes);
    match event {
        Event::Nap(nap) => format!(
            "{now}: nap {} ({}, {remaining} left)",
            format_time_range(nap.start, nap.end),
            nap.status_label()
        ),
        Event::Awake { start, end, .. } => format!(
            "{now}: awake {} ({remaining} left)",
            format_time_range(*start, *end)
        ),
        Event::Bedtime { start, .. } => format!("{now}: bedtime since {}", format_time(*start)),
        Event::Wake { .. } => format!("{now}: waking up"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use nap_core::TimeOfDay;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn test_config() -> Config {
        Config {
            database_path: "unused.db".into(),
            schedule: crate::ScheduleConfig::default(),
            baby: crate::BabyConfig::default(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn render(db: &Database, at: &str) -> String {
        let mut output = Vec::new();
        run(&mut output, db, &test_config(), date(), t(at).minutes(), false).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn awake_before_first_nap() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_wake_time(date(), t("06:00")).unwrap();

        assert_snapshot!(render(&db, "07:00"), @r"
        07:00: awake 06:00–07:30 (30 min left)
        Next nap: 07:30–08:00 (in 30 min)
        ");
    }

    #[test]
    fn during_logged_nap() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_wake_time(date(), t("06:00")).unwrap();
        db.add_nap(date(), t("07:20"), None).unwrap();

        assert_snapshot!(render(&db, "07:35"), @r"
        07:35: nap 07:20–07:50 (in-progress, 15 min left)
        Next nap: 09:20–09:50 (in 1h 45m)
        ");
    }

    #[test]
    fn after_bedtime_marker() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_wake_time(date(), t("06:00")).unwrap();

        assert_snapshot!(render(&db, "19:30"), @"19:30: bedtime since 19:00");
        assert_snapshot!(render(&db, "22:00"), @"22:00: nothing scheduled");
    }

    #[test]
    fn json_includes_current_event() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_wake_time(date(), t("06:00")).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), date(), 460, true).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["time"], 460);
        assert_eq!(report["current"]["id"], "predicted-nap-0");
        assert_eq!(report["next"]["id"], "predicted-nap-1");
    }
}
