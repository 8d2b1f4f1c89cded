use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{TaskId, TimerMode};

pub type SessionId = i64;

/// A finished countdown, built at the instant the timer reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Option<SessionId>,
    pub mode: TimerMode,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub task_id: Option<TaskId>,
    pub completed: bool,
}

impl SessionRecord {
    /// The start time is reconstructed from the duration of the mode that
    /// just finished, not from the focus duration.
    pub fn completed(
        mode: TimerMode,
        duration_minutes: u32,
        ended_at: DateTime<Utc>,
        task_id: Option<TaskId>,
    ) -> Self {
        Self {
            id: None,
            mode,
            duration_minutes,
            started_at: ended_at - Duration::minutes(i64::from(duration_minutes)),
            ended_at,
            task_id,
            completed: true,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        i64::from(self.duration_minutes) * 60
    }

    pub fn is_completed_focus(&self) -> bool {
        self.completed && self.mode == TimerMode::Focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn completed_record_reconstructs_start_from_duration() {
        let ended_at = Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap();

        let record = SessionRecord::completed(TimerMode::ShortBreak, 5, ended_at, None);

        assert_eq!(
            record.started_at,
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 25, 0).unwrap()
        );
        assert!(record.completed);
        assert!(record.id.is_none());
    }

    #[test]
    fn only_completed_focus_counts_as_pomodoro() {
        let now = Utc::now();

        assert!(SessionRecord::completed(TimerMode::Focus, 25, now, None).is_completed_focus());
        assert!(!SessionRecord::completed(TimerMode::LongBreak, 15, now, None).is_completed_focus());
    }

    #[test]
    fn duration_seconds_converts_minutes() {
        let record = SessionRecord::completed(TimerMode::Focus, 25, Utc::now(), Some(3));

        assert_eq!(record.duration_seconds(), 1500);
        assert_eq!(record.task_id, Some(3));
    }
}
