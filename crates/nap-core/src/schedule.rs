//! Day schedule generation.
//!
//! Merges the naps a user actually logged with naps predicted from the
//! wake-window policy, producing one contiguous timeline from wake-up to
//! bedtime.
//!
//! # Algorithm Summary
//!
//! Starting at the wake time, repeatedly:
//!
//! 1. Predict the next nap one wake window after the current time.
//! 2. If the earliest unconsumed logged nap starting at or after the current
//!    time begins no more than 30 minutes after that prediction, use it.
//! 3. Otherwise place the predicted nap, unless it would end less than a wake
//!    window before bedtime, which ends the nap sequence.
//!
//! Awake intervals fill the gaps, a final awake interval runs to bedtime, and
//! a bedtime marker closes the day.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::nap::LoggedNap;
use crate::policy::{PolicyError, SchedulePolicy};
use crate::time::{Minutes, TimeOfDay, format_time};
use crate::types::NapId;

/// A logged nap wins over the prediction if it starts at most this long after it.
pub const LOGGED_NAP_TOLERANCE_MINUTES: Minutes = 30;

/// Highest slot index that can be predicted.
pub const MAX_SLOT_INDEX: usize = 10;

/// Display height of the bedtime marker. Carries no meaning beyond rendering.
pub const BEDTIME_MARKER_MINUTES: Minutes = 60;

/// Errors from schedule generation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    /// The policy would not produce a meaningful schedule.
    #[error("invalid schedule policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    /// A logged nap ends at or before its start.
    #[error("nap {id} ends at {end} which is not after its start at {start}")]
    InvalidNap {
        id: NapId,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

/// Where a nap interval came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum NapStatus {
    /// Placed by the policy; `slot_index` lets the user dismiss it.
    Predicted { slot_index: usize },
    /// A logged nap with a recorded end.
    Actual { actual_data: LoggedNap },
    /// A logged nap still running; its end is estimated from the policy.
    InProgress { actual_data: LoggedNap },
}

/// A nap interval in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NapEvent {
    pub id: String,
    pub start: Minutes,
    pub end: Minutes,
    #[serde(flatten)]
    pub status: NapStatus,
    /// Reserved for flagging naps that overlap bedtime. Never set by generation.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub conflict: bool,
}

impl NapEvent {
    /// Slot index of a predicted nap.
    pub const fn slot_index(&self) -> Option<usize> {
        match &self.status {
            NapStatus::Predicted { slot_index } => Some(*slot_index),
            NapStatus::Actual { .. } | NapStatus::InProgress { .. } => None,
        }
    }

    /// The logged nap behind an actual or in-progress nap.
    pub const fn actual_data(&self) -> Option<&LoggedNap> {
        match &self.status {
            NapStatus::Actual { actual_data } | NapStatus::InProgress { actual_data } => {
                Some(actual_data)
            }
            NapStatus::Predicted { .. } => None,
        }
    }

    /// Short label for the status.
    pub const fn status_label(&self) -> &'static str {
        match self.status {
            NapStatus::Predicted { .. } => "predicted",
            NapStatus::Actual { .. } => "actual",
            NapStatus::InProgress { .. } => "in-progress",
        }
    }
}

/// One entry in a generated day timeline. Times are minutes since midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The moment the day starts.
    Wake { id: String, time: Minutes },
    /// Time awake between naps.
    Awake {
        id: String,
        start: Minutes,
        end: Minutes,
    },
    /// A predicted or logged nap.
    Nap(NapEvent),
    /// Night sleep begins at `start`; `end` only sizes the marker for display.
    Bedtime {
        id: String,
        start: Minutes,
        end: Minutes,
    },
}

impl Event {
    pub fn id(&self) -> &str {
        match self {
            Self::Wake { id, .. } | Self::Awake { id, .. } | Self::Bedtime { id, .. } => id,
            Self::Nap(nap) => &nap.id,
        }
    }

    /// Event type as rendered in JSON output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Wake { .. } => "wake",
            Self::Awake { .. } => "awake",
            Self::Nap(_) => "nap",
            Self::Bedtime { .. } => "bedtime",
        }
    }

    /// Start of the interval, or the time of a point event.
    pub const fn start(&self) -> Minutes {
        match self {
            Self::Wake { time, .. } => *time,
            Self::Awake { start, .. } | Self::Bedtime { start, .. } => *start,
            Self::Nap(nap) => nap.start,
        }
    }

    /// End of the interval, or the time of a point event.
    pub const fn end(&self) -> Minutes {
        match self {
            Self::Wake { time, .. } => *time,
            Self::Awake { end, .. } | Self::Bedtime { end, .. } => *end,
            Self::Nap(nap) => nap.end,
        }
    }

    pub const fn as_nap(&self) -> Option<&NapEvent> {
        match self {
            Self::Nap(nap) => Some(nap),
            _ => None,
        }
    }
}

fn awake(label: impl std::fmt::Display, start: Minutes, end: Minutes) -> Event {
    Event::Awake {
        id: format!("awake-{label}"),
        start,
        end,
    }
}

/// Generates the timeline for one day.
///
/// `logged_naps` may be in any order. Each logged nap is used at most once,
/// and a logged nap starting before the point the timeline has already
/// reached is never placed.
///
/// # Errors
///
/// Fails if the policy has non-positive durations or a logged nap ends at or
/// before its start.
pub fn generate_day_schedule(
    wake_time: TimeOfDay,
    policy: &SchedulePolicy,
    logged_naps: &[LoggedNap],
    skipped_slots: &BTreeSet<usize>,
) -> Result<Vec<Event>, ScheduleError> {
    policy.validate()?;
    if let Some(nap) = logged_naps.iter().find(|nap| !nap.is_consistent()) {
        return Err(ScheduleError::InvalidNap {
            id: nap.id.clone(),
            start: nap.start_time,
            end: nap.end_time.unwrap_or(nap.start_time),
        });
    }

    let wake_window = policy.wake_window_minutes();
    let nap_duration = policy.nap_duration_minutes();
    let bedtime = policy.bedtime_minutes();

    // Stable sort keeps input order for naps that start together.
    let mut remaining: Vec<&LoggedNap> = logged_naps.iter().collect();
    remaining.sort_by_key(|nap| nap.start_time);

    let mut current = wake_time.minutes();
    let mut slot_index = 0;
    let mut events = vec![Event::Wake {
        id: "wake".to_string(),
        time: current,
    }];

    loop {
        let predicted_start = current + wake_window;

        let matched = remaining
            .iter()
            .position(|nap| nap.start_time.minutes() >= current)
            .filter(|&i| {
                remaining[i].start_time.minutes() <= predicted_start + LOGGED_NAP_TOLERANCE_MINUTES
            });

        if let Some(i) = matched {
            let nap = remaining.remove(i);
            let start = nap.start_time.minutes();
            if start > current {
                events.push(awake(slot_index, current, start));
            }

            let (end, status) = match nap.end_time {
                Some(end) => (
                    end.minutes(),
                    NapStatus::Actual {
                        actual_data: nap.clone(),
                    },
                ),
                None => (
                    start + nap_duration,
                    NapStatus::InProgress {
                        actual_data: nap.clone(),
                    },
                ),
            };
            tracing::debug!(
                slot_index,
                nap_id = %nap.id,
                start = %format_time(start),
                end = %format_time(end),
                "placed logged nap"
            );
            events.push(Event::Nap(NapEvent {
                id: nap.id.to_string(),
                start,
                end,
                status,
                conflict: false,
            }));

            current = end;
            slot_index += 1;
            continue;
        }

        let predicted_end = predicted_start + nap_duration;
        // Must run before any awake filler for this slot, or awake-N overlaps awake-final.
        if predicted_end + wake_window > bedtime {
            tracing::trace!(
                slot_index,
                predicted_end = %format_time(predicted_end),
                "no room for another nap before bedtime"
            );
            break;
        }

        if skipped_slots.contains(&slot_index) {
            // The skipped nap's span stays awake time.
            tracing::trace!(slot_index, "skipped predicted nap");
            events.push(awake(slot_index, current, predicted_end));
        } else {
            if predicted_start > current {
                events.push(awake(slot_index, current, predicted_start));
            }
            events.push(Event::Nap(NapEvent {
                id: format!("predicted-nap-{slot_index}"),
                start: predicted_start,
                end: predicted_end,
                status: NapStatus::Predicted { slot_index },
                conflict: false,
            }));
        }

        current = predicted_end;
        slot_index += 1;
        if slot_index > MAX_SLOT_INDEX {
            tracing::debug!("stopped predicting at the slot cap");
            break;
        }
    }

    if !remaining.is_empty() {
        tracing::debug!(
            unplaced = remaining.len(),
            "logged naps left out of the timeline"
        );
    }

    if current < bedtime {
        events.push(awake("final", current, bedtime));
    }
    events.push(Event::Bedtime {
        id: "bedtime".to_string(),
        start: bedtime,
        end: bedtime + BEDTIME_MARKER_MINUTES,
    });

    if !is_chronological(&events) {
        tracing::warn!(
            wake = %format_time(wake_time.minutes()),
            bedtime = %format_time(bedtime),
            "generated schedule is out of order; logged naps run past bedtime"
        );
    }

    Ok(events)
}

/// Whether no event starts before the previous one ends.
pub fn is_chronological(events: &[Event]) -> bool {
    events.windows(2).all(|pair| pair[1].start() >= pair[0].end())
}

/// Whether `minutes` falls inside an interval event. Point events never match.
pub const fn is_time_in_event(minutes: Minutes, event: &Event) -> bool {
    match event {
        Event::Wake { .. } => false,
        _ => minutes >= event.start() && minutes < event.end(),
    }
}

/// The first event covering `minutes`.
pub fn current_event(events: &[Event], minutes: Minutes) -> Option<&Event> {
    events.iter().find(|event| is_time_in_event(minutes, event))
}
