use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::TimerMode;

const fn non_zero(value: u32) -> NonZeroU32 {
    match NonZeroU32::new(value) {
        Some(value) => value,
        None => panic!("timer setting must be non-zero"),
    }
}

pub const DEFAULT_FOCUS_MINUTES: NonZeroU32 = non_zero(25);
pub const DEFAULT_SHORT_BREAK_MINUTES: NonZeroU32 = non_zero(5);
pub const DEFAULT_LONG_BREAK_MINUTES: NonZeroU32 = non_zero(15);
pub const DEFAULT_LONG_BREAK_INTERVAL: NonZeroU32 = non_zero(4);

/// Durations and autostart policy read by the timer engine.
///
/// Every numeric field is non-zero, so a long break interval of zero (which
/// would make the long break decision divide by zero) cannot be constructed
/// or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub focus_duration_minutes: NonZeroU32,
    pub short_break_duration_minutes: NonZeroU32,
    pub long_break_duration_minutes: NonZeroU32,
    pub long_break_interval: NonZeroU32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration_minutes: DEFAULT_FOCUS_MINUTES,
            short_break_duration_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_duration_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
        }
    }
}

impl TimerSettings {
    pub fn duration_minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_duration_minutes.get(),
            TimerMode::ShortBreak => self.short_break_duration_minutes.get(),
            TimerMode::LongBreak => self.long_break_duration_minutes.get(),
        }
    }

    pub fn duration_seconds(&self, mode: TimerMode) -> u64 {
        u64::from(self.duration_minutes(mode)) * 60
    }

    pub fn auto_starts(&self, mode: TimerMode) -> bool {
        if mode.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_pomodoros
        }
    }
}
