//! Nap logging and editing.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use nap_core::time::{format_duration, round_to_nearest_5};
use nap_core::{LoggedNap, NapId, NapUpdate, TimeOfDay};
use nap_db::Database;

fn describe(nap: &LoggedNap) -> String {
    match (nap.end_time, nap.duration_minutes()) {
        (Some(end), Some(minutes)) => format!(
            "{}: {}–{end} ({})",
            nap.id,
            nap.start_time,
            format_duration(minutes)
        ),
        _ => format!("{}: {}, in progress", nap.id, nap.start_time),
    }
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    date: NaiveDate,
    start: TimeOfDay,
    end: Option<TimeOfDay>,
) -> Result<()> {
    let id = db.add_nap(date, start, end)?;
    let nap = LoggedNap::new(id, start, end);
    writeln!(writer, "Logged nap {}", describe(&nap))?;
    Ok(())
}

pub fn end<W: Write>(writer: &mut W, db: &mut Database, id: &NapId, end: TimeOfDay) -> Result<()> {
    let update = NapUpdate {
        end_time: Some(Some(end)),
        ..NapUpdate::default()
    };
    let nap = db.update_nap(id, update)?;
    writeln!(writer, "Ended nap {}", describe(&nap))?;
    Ok(())
}

pub fn edit<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: &NapId,
    update: NapUpdate,
) -> Result<()> {
    if update == NapUpdate::default() {
        bail!("Nothing to change. Pass --start, --end or --reopen");
    }
    let nap = db.update_nap(id, update)?;
    writeln!(writer, "Updated nap {}", describe(&nap))?;
    Ok(())
}

/// Shift a nap, keeping its length. The offset is rounded to 5 minutes.
pub fn shift<W: Write>(writer: &mut W, db: &mut Database, id: &NapId, by: i32) -> Result<()> {
    let date = db
        .nap_date(id)?
        .with_context(|| format!("Unknown nap: {id}"))?;
    let day = db.load_day(date)?;
    let nap = day
        .nap(id)
        .with_context(|| format!("Unknown nap: {id}"))?;

    let offset = round_to_nearest_5(f64::from(by));
    if offset == 0 {
        writeln!(writer, "Nap {} not moved", describe(nap))?;
        return Ok(());
    }

    let moved = |time: TimeOfDay| {
        TimeOfDay::new(time.minutes() + offset)
            .with_context(|| format!("Moving by {offset} min would leave the day"))
    };
    let update = NapUpdate {
        start_time: Some(moved(nap.start_time)?),
        end_time: Some(nap.end_time.map(moved).transpose()?),
    };
    let nap = db.update_nap(id, update)?;
    writeln!(writer, "Moved nap {}", describe(&nap))?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: &NapId) -> Result<()> {
    if !db.delete_nap(id)? {
        bail!("Unknown nap: {id}");
    }
    writeln!(writer, "Deleted nap {id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn output_with(id: &NapId, output: Vec<u8>) -> String {
        String::from_utf8(output)
            .unwrap()
            .replace(id.as_str(), "[NAP]")
    }

    #[test]
    fn add_then_end_nap() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        add(&mut output, &mut db, date(), t("09:00"), None).unwrap();
        let id = db.load_day(date()).unwrap().naps[0].id.clone();
        end(&mut output, &mut db, &id, t("10:15")).unwrap();

        assert_eq!(
            output_with(&id, output),
            "Logged nap [NAP]: 09:00, in progress\nEnded nap [NAP]: 09:00–10:15 (1h 15m)\n"
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.add_nap(date(), t("09:00"), None).unwrap();
        let mut output = Vec::new();
        assert!(end(&mut output, &mut db, &id, t("08:30")).is_err());
        assert!(db.load_day(date()).unwrap().naps[0].is_in_progress());
    }

    #[test]
    fn edit_requires_a_change() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.add_nap(date(), t("09:00"), None).unwrap();
        let mut output = Vec::new();
        let err = edit(&mut output, &mut db, &id, NapUpdate::default()).unwrap_err();
        assert!(err.to_string().contains("Nothing to change"));
    }

    #[test]
    fn edit_reopens_nap() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.add_nap(date(), t("09:00"), Some(t("09:40"))).unwrap();
        let mut output = Vec::new();
        let update = NapUpdate {
            end_time: Some(None),
            ..NapUpdate::default()
        };
        edit(&mut output, &mut db, &id, update).unwrap();
        assert!(db.load_day(date()).unwrap().naps[0].is_in_progress());
    }

    #[test]
    fn move_rounds_offset_to_five_minutes() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.add_nap(date(), t("09:00"), Some(t("09:40"))).unwrap();
        let mut output = Vec::new();
        shift(&mut output, &mut db, &id, -12).unwrap();

        let nap = db.load_day(date()).unwrap().naps[0].clone();
        assert_eq!(nap.start_time, t("08:50"));
        assert_eq!(nap.end_time, Some(t("09:30")));
        assert_eq!(
            output_with(&id, output),
            "Moved nap [NAP]: 08:50–09:30 (40 min)\n"
        );
    }

    #[test]
    fn move_past_midnight_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let id = db.add_nap(date(), t("23:30"), Some(t("23:50"))).unwrap();
        let mut output = Vec::new();
        let err = shift(&mut output, &mut db, &id, 15).unwrap_err();
        assert!(err.to_string().contains("would leave the day"));
    }

    #[test]
    fn delete_unknown_nap_fails() {
        let mut db = Database::open_in_memory().unwrap();
        let id = NapId::new("nap-missing").unwrap();
        let mut output = Vec::new();
        assert!(delete(&mut output, &mut db, &id).is_err());
    }
}
