//! Averages over past day logs.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::day::DayLog;
use crate::time::{MINUTES_PER_DAY, Minutes};

/// Summary statistics over a set of day logs.
///
/// Times are fractional minutes since midnight. Standard deviations need at
/// least two samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub days: usize,
    pub avg_wake_time: Option<f64>,
    pub wake_time_std_dev: Option<f64>,
    pub avg_naps_per_day: Option<f64>,
    /// Averaged over days with any completed nap time.
    pub avg_total_nap_minutes: Option<f64>,
    pub avg_bedtime: Option<f64>,
    pub bedtime_std_dev: Option<f64>,
}

impl HistoryStats {
    pub fn from_days(days: &[DayLog]) -> Self {
        if days.is_empty() {
            return Self::default();
        }

        let wake_times: Vec<f64> = days
            .iter()
            .filter_map(|d| d.wake_time)
            .map(|t| f64::from(t.minutes()))
            .collect();
        let bedtimes: Vec<f64> = days
            .iter()
            .filter_map(|d| d.bedtime)
            .map(|t| f64::from(t.minutes()))
            .collect();
        let nap_counts: Vec<f64> = days
            .iter()
            .map(|d| f64::from(u32::try_from(d.naps.len()).unwrap_or(u32::MAX)))
            .collect();
        let nap_totals: Vec<f64> = days
            .iter()
            .map(DayLog::total_nap_minutes)
            .filter(|&total| total > 0)
            .map(f64::from)
            .collect();

        Self {
            days: days.len(),
            avg_wake_time: mean(&wake_times),
            wake_time_std_dev: std_dev(&wake_times),
            avg_naps_per_day: mean(&nap_counts),
            avg_total_nap_minutes: mean(&nap_totals),
            avg_bedtime: mean(&bedtimes),
            bedtime_std_dev: std_dev(&bedtimes),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "at most a few dozen samples"
)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
#[expect(
    clippy::cast_precision_loss,
    reason = "at most a few dozen samples"
)]
fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Formats an averaged time of day as a 12-hour clock, e.g. `6:45 AM`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "averages of times of day stay within a day"
)]
pub fn format_clock_12h(minutes: f64) -> String {
    let total = (minutes.round() as Minutes).rem_euclid(MINUTES_PER_DAY);
    let hours = total / 60;
    let mins = total % 60;
    let period = if hours < 12 { "AM" } else { "PM" };
    let hours12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{hours12}:{mins:02} {period}")
}

/// Formats a standard deviation in minutes, e.g. `±12 min`.
pub fn format_spread(std_dev: f64) -> String {
    format!("±{std_dev:.0} min")
}

/// How long ago a day was, for grouping history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryGroup {
    Today,
    ThisWeek,
    LastWeek,
    Earlier,
}

impl HistoryGroup {
    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        match (today - date).num_days() {
            ..=0 => Self::Today,
            1..7 => Self::ThisWeek,
            7..14 => Self::LastWeek,
            _ => Self::Earlier,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::LastWeek => "Last Week",
            Self::Earlier => "Earlier",
        }
    }
}

impl fmt::Display for HistoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Groups days in their given order, starting a new group whenever it changes.
pub fn group_days(days: &[DayLog], today: NaiveDate) -> Vec<(HistoryGroup, Vec<&DayLog>)> {
    let mut groups: Vec<(HistoryGroup, Vec<&DayLog>)> = Vec::new();
    for day in days {
        let group = HistoryGroup::for_date(day.date, today);
        match groups.last_mut() {
            Some((last, members)) if *last == group => members.push(day),
            _ => groups.push((group, vec![day])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::nap::LoggedNap;
    use crate::time::TimeOfDay;
    use crate::types::NapId;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn day_with(
        day: u32,
        wake: Option<&str>,
        bedtime: Option<&str>,
        naps: &[(&str, Option<&str>)],
    ) -> DayLog {
        let mut log = DayLog::new(date(day));
        log.wake_time = wake.map(t);
        log.bedtime = bedtime.map(t);
        for (i, (start, end)) in naps.iter().enumerate() {
            log.add_nap(LoggedNap::new(
                NapId::new(format!("nap-{day}-{i}")).unwrap(),
                t(start),
                end.map(t),
            ))
            .unwrap();
        }
        log
    }

    #[test]
    fn empty_history_has_no_stats() {
        assert_eq!(HistoryStats::from_days(&[]), HistoryStats::default());
    }

    #[test]
    fn averages_over_days() {
        let days = [
            day_with(10, Some("06:00"), Some("19:00"), &[("09:00", Some("10:00"))]),
            day_with(
                11,
                Some("07:00"),
                Some("19:30"),
                &[("09:00", Some("09:30")), ("13:00", None)],
            ),
            day_with(12, None, None, &[("14:00", None)]),
        ];
        let stats = HistoryStats::from_days(&days);

        assert_eq!(stats.days, 3);
        assert_eq!(stats.avg_wake_time, Some(390.0));
        assert_eq!(stats.wake_time_std_dev, Some(30.0));
        assert_eq!(stats.avg_naps_per_day, Some(4.0 / 3.0));
        // The third day has no completed naps and is left out.
        assert_eq!(stats.avg_total_nap_minutes, Some(45.0));
        assert_eq!(stats.avg_bedtime, Some(1155.0));
        assert_eq!(stats.bedtime_std_dev, Some(15.0));
    }

    #[test]
    fn single_sample_has_no_spread() {
        let stats = HistoryStats::from_days(&[day_with(10, Some("06:00"), None, &[])]);
        assert!(stats.avg_wake_time.is_some());
        assert_eq!(stats.wake_time_std_dev, None);
        assert_eq!(stats.avg_bedtime, None);
    }

    #[test]
    fn twelve_hour_clock_formatting() {
        assert_eq!(format_clock_12h(390.0), "6:30 AM");
        assert_eq!(format_clock_12h(0.0), "12:00 AM");
        assert_eq!(format_clock_12h(720.0), "12:00 PM");
        assert_eq!(format_clock_12h(1155.4), "7:15 PM");
        assert_eq!(format_clock_12h(419.6), "7:00 AM");
        assert_eq!(format_spread(12.4), "±12 min");
    }

    #[test]
    fn history_groups_by_age() {
        let today = date(20);
        assert_eq!(HistoryGroup::for_date(date(20), today), HistoryGroup::Today);
        assert_eq!(HistoryGroup::for_date(date(19), today), HistoryGroup::ThisWeek);
        assert_eq!(HistoryGroup::for_date(date(14), today), HistoryGroup::ThisWeek);
        assert_eq!(HistoryGroup::for_date(date(13), today), HistoryGroup::LastWeek);
        assert_eq!(HistoryGroup::for_date(date(7), today), HistoryGroup::LastWeek);
        assert_eq!(HistoryGroup::for_date(date(6), today), HistoryGroup::Earlier);
    }

    #[test]
    fn group_days_keeps_order() {
        let days = [
            day_with(20, Some("06:00"), None, &[]),
            day_with(18, Some("06:00"), None, &[]),
            day_with(16, Some("06:00"), None, &[]),
            day_with(2, Some("06:00"), None, &[]),
        ];
        let groups = group_days(&days, date(20));
        let summary: Vec<(HistoryGroup, usize)> =
            groups.iter().map(|(g, members)| (*g, members.len())).collect();
        assert_eq!(
            summary,
            [
                (HistoryGroup::Today, 1),
                (HistoryGroup::ThisWeek, 2),
                (HistoryGroup::Earlier, 1),
            ]
        );
    }
}
