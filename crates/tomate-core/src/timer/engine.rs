use std::sync::Arc;

use tracing::{debug, warn};

use super::{TimerSnapshot, TimerState};
use crate::domain::{SessionRecord, TaskId, TimerMode, TimerSettings};
use crate::ports::{Clock, SessionRecorder, SessionRecorderError, SettingsProvider};

/// What a single call to [`TimerEngine::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is stopped or paused; nothing changed.
    Idle,
    Counting { remaining_seconds: u64 },
    Completed(SessionCompletion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCompletion {
    pub finished_mode: TimerMode,
    pub duration_minutes: u32,
    pub next_mode: TimerMode,
    pub auto_started: bool,
    pub sessions_completed_in_cycle: u32,
    pub recorder_error: Option<SessionRecorderError>,
}

pub struct TimerEngine {
    state: TimerState,
    /// Length of the session in progress, fixed when the mode was entered.
    session_total_seconds: u64,
    settings: Arc<dyn SettingsProvider>,
    recorder: Arc<dyn SessionRecorder>,
    clock: Arc<dyn Clock>,
}

impl TimerEngine {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        recorder: Arc<dyn SessionRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let focus_seconds = settings.current().duration_seconds(TimerMode::Focus);

        Self {
            state: TimerState::initial(focus_seconds),
            session_total_seconds: focus_seconds,
            settings,
            recorder,
            clock,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state.clone(),
            total_seconds: self.session_total_seconds,
        }
    }

    pub fn start(&mut self) {
        self.state.is_running = true;
        self.state.is_paused = false;
    }

    pub fn pause(&mut self) {
        self.state.is_running = false;
        self.state.is_paused = true;
    }

    /// Stops the timer and refills the current mode. Mode and cycle count
    /// are kept.
    pub fn reset(&mut self) {
        let settings = self.settings.current();
        self.enter_mode(self.state.mode, &settings);
        self.state.is_running = false;
    }

    pub fn switch_mode(&mut self, mode: TimerMode) {
        let settings = self.settings.current();
        self.enter_mode(mode, &settings);
        self.state.is_running = false;
    }

    pub fn select_task(&mut self, task_id: Option<TaskId>) {
        self.state.current_task_id = task_id;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_ticking() {
            return TickOutcome::Idle;
        }

        if self.state.remaining_seconds > 1 {
            self.state.remaining_seconds -= 1;
            return TickOutcome::Counting {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        TickOutcome::Completed(self.complete_session())
    }

    fn complete_session(&mut self) -> SessionCompletion {
        let finished_mode = self.state.mode;
        let duration_minutes = u32::try_from(self.session_total_seconds / 60).unwrap_or(u32::MAX);
        let record = SessionRecord::completed(
            finished_mode,
            duration_minutes,
            self.clock.now(),
            self.state.current_task_id,
        );

        let recorder_error = self.recorder.record(record).err();
        if let Some(ref error) = recorder_error {
            warn!(%error, mode = %finished_mode, "failed to record completed session");
        }

        let settings = self.settings.current();
        let next_mode = self.next_mode_after(finished_mode, &settings);
        self.enter_mode(next_mode, &settings);
        self.state.is_running = settings.auto_starts(next_mode);

        debug!(
            finished = %finished_mode,
            next = %next_mode,
            auto_started = self.state.is_running,
            "session completed"
        );

        SessionCompletion {
            finished_mode,
            duration_minutes,
            next_mode,
            auto_started: self.state.is_running,
            sessions_completed_in_cycle: self.state.sessions_completed_in_cycle,
            recorder_error,
        }
    }

    fn next_mode_after(&mut self, finished_mode: TimerMode, settings: &TimerSettings) -> TimerMode {
        if finished_mode.is_break() {
            return TimerMode::Focus;
        }

        self.state.sessions_completed_in_cycle += 1;
        if self.state.sessions_completed_in_cycle % settings.long_break_interval.get() == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        }
    }

    fn enter_mode(&mut self, mode: TimerMode, settings: &TimerSettings) {
        let total = settings.duration_seconds(mode);
        self.state.mode = mode;
        self.state.remaining_seconds = total;
        self.state.is_paused = false;
        self.session_total_seconds = total;
    }
}
