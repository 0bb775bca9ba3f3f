//! Naps recorded by the user.

use serde::{Deserialize, Serialize};

use crate::time::{Minutes, TimeOfDay};
use crate::types::NapId;

/// A nap observed and logged for one day.
///
/// A missing `end_time` means the nap is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedNap {
    pub id: NapId,
    pub start_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeOfDay>,
}

impl LoggedNap {
    /// Creates a logged nap.
    pub const fn new(id: NapId, start_time: TimeOfDay, end_time: Option<TimeOfDay>) -> Self {
        Self {
            id,
            start_time,
            end_time,
        }
    }

    /// Whether the nap has not ended yet.
    pub const fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    /// A nap is consistent when it is open or ends strictly after it starts.
    pub fn is_consistent(&self) -> bool {
        self.end_time.is_none_or(|end| end > self.start_time)
    }

    /// Length of a completed nap. `None` while the nap is running.
    pub fn duration_minutes(&self) -> Option<Minutes> {
        self.end_time
            .map(|end| end.minutes() - self.start_time.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nap(start: &str, end: Option<&str>) -> LoggedNap {
        LoggedNap::new(
            NapId::new("nap-1").unwrap(),
            start.parse().unwrap(),
            end.map(|e| e.parse().unwrap()),
        )
    }

    #[test]
    fn open_nap_is_in_progress_and_consistent() {
        let nap = nap("13:00", None);
        assert!(nap.is_in_progress());
        assert!(nap.is_consistent());
        assert_eq!(nap.duration_minutes(), None);
    }

    #[test]
    fn nap_must_end_after_it_starts() {
        assert!(nap("13:00", Some("13:45")).is_consistent());
        assert!(!nap("13:00", Some("13:00")).is_consistent());
        assert!(!nap("13:00", Some("12:30")).is_consistent());
    }

    #[test]
    fn duration_of_completed_nap() {
        assert_eq!(nap("09:10", Some("10:25")).duration_minutes(), Some(75));
    }

    #[test]
    fn serde_omits_missing_end_time() {
        let json = serde_json::to_string(&nap("13:00", None)).unwrap();
        assert_eq!(json, r#"{"id":"nap-1","start_time":"13:00"}"#);
        let parsed: LoggedNap = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_in_progress());
    }
}
