//! Core domain logic for the nap planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Schedule generation: merging logged naps with wake-window predictions
//! - Time arithmetic on `HH:MM` times of day
//! - Day logs, history statistics and baby age
//!
//! Nothing here touches storage, the clock, or the terminal.

pub mod age;
pub mod day;
pub mod history;
mod nap;
mod policy;
mod schedule;
pub mod time;
mod types;

pub use day::{DayLog, DayLogError, NapUpdate};
pub use history::{HistoryGroup, HistoryStats};
pub use nap::LoggedNap;
pub use policy::{PolicyError, SchedulePolicy};
pub use schedule::{
    BEDTIME_MARKER_MINUTES, Event, LOGGED_NAP_TOLERANCE_MINUTES, MAX_SLOT_INDEX, NapEvent,
    NapStatus, ScheduleError, current_event, generate_day_schedule, is_chronological,
    is_time_in_event,
};
pub use time::{Minutes, TimeOfDay, TimeParseError};
pub use types::{NapId, ValidationError};
