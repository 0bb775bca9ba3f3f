//! Recurring schedule preferences.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{Minutes, TimeOfDay, hours_to_minutes};

/// Longest wake window or nap duration accepted, in hours.
const MAX_POLICY_HOURS: f64 = 24.0;

const DEFAULT_BEDTIME: TimeOfDay = match TimeOfDay::new(19 * 60) {
    Ok(time) => time,
    Err(_) => panic!("19:00 is a valid time of day"),
};

/// Invalid policy values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    /// A duration rounds to zero minutes, is negative, or is not a number.
    #[error("{field} must be a positive number of hours, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A duration is longer than a day.
    #[error("{field} must be at most 24 hours, got {value}")]
    TooLong { field: &'static str, value: f64 },
}

/// How a household's day is expected to run.
///
/// Durations are stored in hours, the unit users configure them in; all
/// schedule arithmetic uses the minute accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePolicy {
    /// Time awake before the next nap is predicted, in hours.
    pub default_wake_window: f64,
    /// Assumed length of a predicted or still-running nap, in hours.
    pub default_nap_duration: f64,
    /// No nap is predicted that would leave less than a wake window before this.
    pub bedtime: TimeOfDay,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            default_wake_window: 1.5,
            default_nap_duration: 0.5,
            bedtime: DEFAULT_BEDTIME,
        }
    }
}

impl SchedulePolicy {
    /// Checks that both durations are positive and at most a day long.
    pub fn validate(&self) -> Result<(), PolicyError> {
        check_hours("default_wake_window", self.default_wake_window)?;
        check_hours("default_nap_duration", self.default_nap_duration)?;
        Ok(())
    }

    /// Wake window in whole minutes.
    pub fn wake_window_minutes(&self) -> Minutes {
        hours_to_minutes(self.default_wake_window)
    }

    /// Nap duration in whole minutes.
    pub fn nap_duration_minutes(&self) -> Minutes {
        hours_to_minutes(self.default_nap_duration)
    }

    /// Bedtime in minutes since midnight.
    pub const fn bedtime_minutes(&self) -> Minutes {
        self.bedtime.minutes()
    }
}

fn check_hours(field: &'static str, value: f64) -> Result<(), PolicyError> {
    if value.is_nan() || value <= 0.0 || hours_to_minutes(value) <= 0 {
        return Err(PolicyError::NonPositive { field, value });
    }
    if value > MAX_POLICY_HOURS {
        return Err(PolicyError::TooLong { field, value });
    }
    Ok(())
}
