//! One day's log: what the user recorded, plus the edits they can make to it.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nap::LoggedNap;
use crate::policy::SchedulePolicy;
use crate::schedule::{Event, ScheduleError, generate_day_schedule};
use crate::time::{Minutes, TimeOfDay};
use crate::types::NapId;

/// Errors from editing a day log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DayLogError {
    /// No nap with this ID is logged for the day.
    #[error("no nap {0} on this day")]
    UnknownNap(NapId),

    /// A nap with this ID is already logged for the day.
    #[error("nap {0} is already logged")]
    DuplicateNap(NapId),

    /// The nap would end at or before its start.
    #[error("nap {id} would end at {end}, not after its start at {start}")]
    InvalidNap {
        id: NapId,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

/// Fields to change on a logged nap. `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NapUpdate {
    pub start_time: Option<TimeOfDay>,
    /// `Some(None)` reopens the nap.
    pub end_time: Option<Option<TimeOfDay>>,
}

/// Everything recorded for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    /// When the baby actually woke up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<TimeOfDay>,
    /// When night sleep actually started. Only used for history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedtime: Option<TimeOfDay>,
    #[serde(default)]
    pub naps: Vec<LoggedNap>,
    /// Predicted nap slots the user dismissed.
    #[serde(default)]
    pub skipped_slots: BTreeSet<usize>,
}

impl DayLog {
    /// An empty log for `date`.
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            wake_time: None,
            bedtime: None,
            naps: Vec::new(),
            skipped_slots: BTreeSet::new(),
        }
    }

    pub const fn set_wake_time(&mut self, time: TimeOfDay) {
        self.wake_time = Some(time);
    }

    pub const fn set_bedtime(&mut self, time: TimeOfDay) {
        self.bedtime = Some(time);
    }

    pub fn nap(&self, id: &NapId) -> Option<&LoggedNap> {
        self.naps.iter().find(|nap| &nap.id == id)
    }

    /// Records a nap.
    pub fn add_nap(&mut self, nap: LoggedNap) -> Result<(), DayLogError> {
        if self.nap(&nap.id).is_some() {
            return Err(DayLogError::DuplicateNap(nap.id));
        }
        check_nap(&nap)?;
        self.naps.push(nap);
        Ok(())
    }

    /// Applies `update` to a logged nap. The nap is unchanged on error.
    pub fn update_nap(&mut self, id: &NapId, update: NapUpdate) -> Result<(), DayLogError> {
        let nap = self
            .naps
            .iter_mut()
            .find(|nap| &nap.id == id)
            .ok_or_else(|| DayLogError::UnknownNap(id.clone()))?;

        let updated = LoggedNap {
            id: nap.id.clone(),
            start_time: update.start_time.unwrap_or(nap.start_time),
            end_time: update.end_time.unwrap_or(nap.end_time),
        };
        check_nap(&updated)?;
        *nap = updated;
        Ok(())
    }

    /// Removes a logged nap and returns it.
    pub fn delete_nap(&mut self, id: &NapId) -> Result<LoggedNap, DayLogError> {
        let index = self
            .naps
            .iter()
            .position(|nap| &nap.id == id)
            .ok_or_else(|| DayLogError::UnknownNap(id.clone()))?;
        Ok(self.naps.remove(index))
    }

    /// Dismisses a predicted nap slot. Skipping twice is a no-op.
    pub fn skip_slot(&mut self, slot_index: usize) -> bool {
        self.skipped_slots.insert(slot_index)
    }

    /// Whether anything was recorded, which decides if the day shows in history.
    pub fn has_activity(&self) -> bool {
        self.wake_time.is_some() || !self.naps.is_empty()
    }

    /// Total minutes of completed naps.
    pub fn total_nap_minutes(&self) -> Minutes {
        self.naps.iter().filter_map(LoggedNap::duration_minutes).sum()
    }

    /// The logged wake time, or `typical_wake_time` if none was logged.
    pub fn effective_wake_time(&self, typical_wake_time: TimeOfDay) -> TimeOfDay {
        self.wake_time.unwrap_or(typical_wake_time)
    }

    /// Generates this day's timeline.
    pub fn schedule(
        &self,
        policy: &SchedulePolicy,
        typical_wake_time: TimeOfDay,
    ) -> Result<Vec<Event>, ScheduleError> {
        generate_day_schedule(
            self.effective_wake_time(typical_wake_time),
            policy,
            &self.naps,
            &self.skipped_slots,
        )
    }
}

fn check_nap(nap: &LoggedNap) -> Result<(), DayLogError> {
    match nap.end_time {
        Some(end) if end <= nap.start_time => Err(DayLogError::InvalidNap {
            id: nap.id.clone(),
            start: nap.start_time,
            end,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn id(s: &str) -> NapId {
        NapId::new(s).unwrap()
    }

    fn day() -> DayLog {
        DayLog::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap())
    }

    #[test]
    fn new_day_is_empty() {
        let day = day();
        assert!(!day.has_activity());
        assert_eq!(day.total_nap_minutes(), 0);
        assert!(day.skipped_slots.is_empty());
    }

    #[test]
    fn add_nap_rejects_duplicates_and_inverted_times() {
        let mut day = day();
        day.add_nap(LoggedNap::new(id("a"), t("09:00"), Some(t("09:40"))))
            .unwrap();
        assert_eq!(
            day.add_nap(LoggedNap::new(id("a"), t("11:00"), None)),
            Err(DayLogError::DuplicateNap(id("a")))
        );
        assert!(matches!(
            day.add_nap(LoggedNap::new(id("b"), t("11:00"), Some(t("10:00")))),
            Err(DayLogError::InvalidNap { .. })
        ));
        assert_eq!(day.naps.len(), 1);
        assert!(day.has_activity());
    }

    #[test]
    fn update_nap_changes_only_given_fields() {
        let mut day = day();
        day.add_nap(LoggedNap::new(id("a"), t("13:00"), None)).unwrap();

        day.update_nap(
            &id("a"),
            NapUpdate {
                end_time: Some(Some(t("14:10"))),
                ..NapUpdate::default()
            },
        )
        .unwrap();
        let nap = day.nap(&id("a")).unwrap();
        assert_eq!(nap.start_time, t("13:00"));
        assert_eq!(nap.end_time, Some(t("14:10")));

        day.update_nap(
            &id("a"),
            NapUpdate {
                end_time: Some(None),
                ..NapUpdate::default()
            },
        )
        .unwrap();
        assert!(day.nap(&id("a")).unwrap().is_in_progress());
    }

    #[test]
    fn invalid_update_leaves_nap_untouched() {
        let mut day = day();
        day.add_nap(LoggedNap::new(id("a"), t("13:00"), Some(t("13:30"))))
            .unwrap();
        let result = day.update_nap(
            &id("a"),
            NapUpdate {
                start_time: Some(t("14:00")),
                end_time: None,
            },
        );
        assert!(matches!(result, Err(DayLogError::InvalidNap { .. })));
        assert_eq!(day.nap(&id("a")).unwrap().start_time, t("13:00"));

        assert_eq!(
            day.update_nap(&id("missing"), NapUpdate::default()),
            Err(DayLogError::UnknownNap(id("missing")))
        );
    }

    #[test]
    fn delete_nap_removes_it() {
        let mut day = day();
        day.add_nap(LoggedNap::new(id("a"), t("13:00"), None)).unwrap();
        let removed = day.delete_nap(&id("a")).unwrap();
        assert_eq!(removed.id, id("a"));
        assert!(day.naps.is_empty());
        assert!(day.delete_nap(&id("a")).is_err());
    }

    #[test]
    fn skip_slot_is_idempotent() {
        let mut day = day();
        assert!(day.skip_slot(2));
        assert!(!day.skip_slot(2));
        assert_eq!(day.skipped_slots.len(), 1);
    }

    #[test]
    fn total_nap_minutes_ignores_running_naps() {
        let mut day = day();
        day.add_nap(LoggedNap::new(id("a"), t("09:00"), Some(t("09:45"))))
            .unwrap();
        day.add_nap(LoggedNap::new(id("b"), t("12:00"), Some(t("13:30"))))
            .unwrap();
        day.add_nap(LoggedNap::new(id("c"), t("16:00"), None)).unwrap();
        assert_eq!(day.total_nap_minutes(), 135);
    }

    #[test]
    fn schedule_falls_back_to_typical_wake_time() {
        let mut day = day();
        let policy = SchedulePolicy::default();

        let events = day.schedule(&policy, t("06:30")).unwrap();
        assert_eq!(events[0].start(), t("06:30").minutes());

        day.set_wake_time(t("07:10"));
        let events = day.schedule(&policy, t("06:30")).unwrap();
        assert_eq!(events[0].start(), t("07:10").minutes());
    }

    #[test]
    fn schedule_honours_skipped_slots() {
        let mut day = day();
        day.skip_slot(0);
        let events = day.schedule(&SchedulePolicy::default(), t("06:00")).unwrap();
        assert!(
            events
                .iter()
                .filter_map(Event::as_nap)
                .all(|nap| nap.slot_index() != Some(0))
        );
    }

    #[test]
    fn day_log_serde_defaults_missing_collections() {
        let json = r#"{"date":"2025-03-14","wake_time":"06:45"}"#;
        let day: DayLog = serde_json::from_str(json).unwrap();
        assert_eq!(day.wake_time, Some(t("06:45")));
        assert!(day.naps.is_empty());
        assert!(day.skipped_slots.is_empty());
    }
}
