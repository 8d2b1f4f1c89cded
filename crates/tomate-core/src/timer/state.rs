use serde::{Deserialize, Serialize};

use crate::domain::{TaskId, TimerMode};

/// Mutable state of the current pomodoro cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub is_paused: bool,
    /// Completed focus sessions. Never reset: the long break decision uses
    /// `count % long_break_interval`.
    pub sessions_completed_in_cycle: u32,
    pub current_task_id: Option<TaskId>,
}

impl TimerState {
    pub fn initial(focus_seconds: u64) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: focus_seconds,
            is_running: false,
            is_paused: false,
            sessions_completed_in_cycle: 0,
            current_task_id: None,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }
}

/// State exposed for rendering, with the total of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub total_seconds: u64,
}

impl TimerSnapshot {
    /// Fraction of the current session already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.total_seconds.saturating_sub(self.state.remaining_seconds);
        (elapsed as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }
}
