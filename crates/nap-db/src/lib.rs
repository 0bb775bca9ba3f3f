//! Storage layer for the nap planner.
//!
//! Persists day logs (wake time, bedtime, naps, skipped slots) using `rusqlite`.
//! This is the only place nap IDs are minted.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Wrap it in a `Mutex` to share it across threads.
//!
//! # Schema
//!
//! Dates are stored as `YYYY-MM-DD` TEXT and times of day as `HH:MM` TEXT, so
//! lexicographic order matches chronological order within a day.
//!
//! Every nap or skipped slot has a row in `days` for its date; writes insert
//! it on demand.

use std::path::Path;

use chrono::{Days, NaiveDate};
use nap_core::{DayLog, DayLogError, LoggedNap, NapId, NapUpdate, TimeOfDay, ValidationError};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use thiserror::Error;
use uuid::Uuid;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The requested edit is not valid for the day.
    #[error(transparent)]
    Day(#[from] DayLogError),
    /// A stored identifier failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A stored value could not be parsed back.
    #[error("invalid {column} in database: {value:?}")]
    InvalidValue { column: &'static str, value: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS days (
                date TEXT PRIMARY KEY,
                wake_time TEXT,
                bedtime TEXT
            );

            -- end_time NULL means the nap is still running
            CREATE TABLE IF NOT EXISTS naps (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                FOREIGN KEY (date) REFERENCES days(date) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_naps_date ON naps(date);

            CREATE TABLE IF NOT EXISTS skipped_slots (
                date TEXT NOT NULL,
                slot_index INTEGER NOT NULL,
                PRIMARY KEY (date, slot_index),
                FOREIGN KEY (date) REFERENCES days(date) ON DELETE CASCADE
            );
            ",
        )?;
        Ok(())
    }

    /// Loads the log for `date`, empty if nothing was recorded.
    pub fn load_day(&self, date: NaiveDate) -> Result<DayLog, DbError> {
        load_day(&self.conn, date)
    }

    /// Records when the baby woke up on `date`.
    pub fn set_wake_time(&mut self, date: NaiveDate, time: TimeOfDay) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        ensure_day(&tx, date)?;
        tx.execute(
            "UPDATE days SET wake_time = ? WHERE date = ?",
            params![time.to_string(), date.to_string()],
        )?;
        tx.commit()?;
        tracing::debug!(%date, %time, "set wake time");
        Ok(())
    }

    /// Records when night sleep started on `date`.
    pub fn set_bedtime(&mut self, date: NaiveDate, time: TimeOfDay) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        ensure_day(&tx, date)?;
        tx.execute(
            "UPDATE days SET bedtime = ? WHERE date = ?",
            params![time.to_string(), date.to_string()],
        )?;
        tx.commit()?;
        tracing::debug!(%date, %time, "set bedtime");
        Ok(())
    }

    /// Logs a new nap and returns its freshly minted ID.
    pub fn add_nap(
        &mut self,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: Option<TimeOfDay>,
    ) -> Result<NapId, DbError> {
        let id = NapId::new(format!("nap-{}", Uuid::new_v4()))?;
        let nap = LoggedNap::new(id.clone(), start_time, end_time);

        let tx = self.conn.transaction()?;
        let mut day = load_day(&tx, date)?;
        day.add_nap(nap)?;
        ensure_day(&tx, date)?;
        tx.execute(
            "INSERT INTO naps (id, date, start_time, end_time) VALUES (?, ?, ?, ?)",
            params![
                id.as_str(),
                date.to_string(),
                start_time.to_string(),
                end_time.map(String::from),
            ],
        )?;
        tx.commit()?;
        tracing::debug!(%date, nap_id = %id, "added nap");
        Ok(id)
    }

    /// The date a nap was logged on.
    pub fn nap_date(&self, id: &NapId) -> Result<Option<NaiveDate>, DbError> {
        nap_date(&self.conn, id)
    }

    /// Edits a logged nap and returns it as stored.
    pub fn update_nap(&mut self, id: &NapId, update: NapUpdate) -> Result<LoggedNap, DbError> {
        let tx = self.conn.transaction()?;
        let date =
            nap_date(&tx, id)?.ok_or_else(|| DbError::Day(DayLogError::UnknownNap(id.clone())))?;
        let mut day = load_day(&tx, date)?;
        day.update_nap(id, update)?;
        let nap = day
            .nap(id)
            .cloned()
            .ok_or_else(|| DbError::Day(DayLogError::UnknownNap(id.clone())))?;

        tx.execute(
            "UPDATE naps SET start_time = ?, end_time = ? WHERE id = ?",
            params![
                nap.start_time.to_string(),
                nap.end_time.map(String::from),
                id.as_str(),
            ],
        )?;
        tx.commit()?;
        tracing::debug!(%date, nap_id = %id, "updated nap");
        Ok(nap)
    }

    /// Deletes a nap. Returns false if no such nap exists.
    pub fn delete_nap(&mut self, id: &NapId) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM naps WHERE id = ?", [id.as_str()])?;
        tracing::debug!(nap_id = %id, deleted, "deleted nap");
        Ok(deleted > 0)
    }

    /// Dismisses a predicted nap slot. Returns false if it was already skipped.
    pub fn skip_slot(&mut self, date: NaiveDate, slot_index: usize) -> Result<bool, DbError> {
        let slot = i64::try_from(slot_index).map_err(|_| DbError::InvalidValue {
            column: "skipped_slots.slot_index",
            value: slot_index.to_string(),
        })?;
        let tx = self.conn.transaction()?;
        ensure_day(&tx, date)?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO skipped_slots (date, slot_index) VALUES (?, ?)",
            params![date.to_string(), slot],
        )?;
        tx.commit()?;
        tracing::debug!(%date, slot_index, "skipped slot");
        Ok(inserted > 0)
    }

    /// Day logs with any activity in the `days` days ending at `today`, newest first.
    pub fn history(&self, today: NaiveDate, days: u32) -> Result<Vec<DayLog>, DbError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let start = today
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        let mut stmt = self.conn.prepare(
            "
            SELECT date FROM days
            WHERE date >= ? AND date <= ?
            ORDER BY date DESC
            ",
        )?;
        let rows = stmt.query_map(params![start.to_string(), today.to_string()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let day = load_day(&self.conn, parse_date(&row?)?)?;
            if day.has_activity() {
                logs.push(day);
            }
        }
        Ok(logs)
    }
}

fn ensure_day(tx: &Transaction<'_>, date: NaiveDate) -> Result<(), DbError> {
    tx.execute(
        "INSERT OR IGNORE INTO days (date) VALUES (?)",
        [date.to_string()],
    )?;
    Ok(())
}

fn load_day(conn: &Connection, date: NaiveDate) -> Result<DayLog, DbError> {
    let mut day = DayLog::new(date);
    let key = date.to_string();

    let times: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT wake_time, bedtime FROM days WHERE date = ?",
            [&key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let Some((wake_time, bedtime)) = times else {
        return Ok(day);
    };
    day.wake_time = wake_time
        .map(|t| parse_time("days.wake_time", &t))
        .transpose()?;
    day.bedtime = bedtime
        .map(|t| parse_time("days.bedtime", &t))
        .transpose()?;

    // rowid keeps insertion order for naps that start at the same minute.
    let mut stmt = conn.prepare(
        "
        SELECT id, start_time, end_time FROM naps
        WHERE date = ?
        ORDER BY start_time ASC, rowid ASC
        ",
    )?;
    let rows = stmt.query_map([&key], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;
    for row in rows {
        let (id, start, end) = row?;
        day.naps.push(LoggedNap::new(
            NapId::new(id)?,
            parse_time("naps.start_time", &start)?,
            end.map(|t| parse_time("naps.end_time", &t)).transpose()?,
        ));
    }

    let mut stmt =
        conn.prepare("SELECT slot_index FROM skipped_slots WHERE date = ? ORDER BY slot_index")?;
    let rows = stmt.query_map([&key], |row| row.get::<_, i64>(0))?;
    for row in rows {
        let slot = row?;
        let slot = usize::try_from(slot).map_err(|_| DbError::InvalidValue {
            column: "skipped_slots.slot_index",
            value: slot.to_string(),
        })?;
        day.skipped_slots.insert(slot);
    }

    Ok(day)
}

fn nap_date(conn: &Connection, id: &NapId) -> Result<Option<NaiveDate>, DbError> {
    let date: Option<String> = conn
        .query_row("SELECT date FROM naps WHERE id = ?", [id.as_str()], |row| {
            row.get(0)
        })
        .optional()?;
    date.map(|d| parse_date(&d)).transpose()
}

fn parse_time(column: &'static str, value: &str) -> Result<TimeOfDay, DbError> {
    value.parse().map_err(|_| DbError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, DbError> {
    value.parse().map_err(|_| DbError::InvalidValue {
        column: "days.date",
        value: value.to_string(),
    })
}
