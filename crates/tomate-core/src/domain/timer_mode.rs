use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timer mode: {0}. Available modes: focus, short-break, long-break")]
pub struct UnknownTimerModeError(String);

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short-break",
            TimerMode::LongBreak => "long-break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }

    pub fn all() -> &'static [TimerMode] {
        &[TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak]
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = UnknownTimerModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "focus" | "pomodoro" => Ok(TimerMode::Focus),
            "short-break" | "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "long-break" | "longbreak" | "long" => Ok(TimerMode::LongBreak),
            other => Err(UnknownTimerModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_value_roundtrip() {
        for mode in TimerMode::all() {
            let restored: TimerMode = mode.as_str().parse().unwrap();
            assert_eq!(*mode, restored);
        }
    }

    #[test]
    fn parse_accepts_short_aliases() {
        assert_eq!("short".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert_eq!("LONG".parse::<TimerMode>().unwrap(), TimerMode::LongBreak);
        assert_eq!("pomodoro".parse::<TimerMode>().unwrap(), TimerMode::Focus);
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn only_breaks_are_breaks() {
        assert!(!TimerMode::Focus.is_break());
        assert!(TimerMode::ShortBreak.is_break());
        assert!(TimerMode::LongBreak.is_break());
    }
}
