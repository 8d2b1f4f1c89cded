//! Tomate core library
//!
//! Domain types, the timer/session state engine and the port definitions
//! (traits) the engine and the applications depend on. This crate has no
//! knowledge of storage, IPC or desktop notifications.

pub mod config;
pub mod domain;
pub mod i18n;
pub mod ports;
pub mod timer;

pub use config::{Config, ConfigError, GeneralConfig, NotificationConfig, NotificationUrgency};
pub use domain::{
    Note, NoteId, SessionId, SessionRecord, Stats, Task, TaskId, TaskPriority, TimerMode,
    TimerSettings, UnknownPriorityError, UnknownTimerModeError,
};
pub use i18n::{Language, Translator, UnsupportedLanguageError};
pub use ports::{
    Clock, NoteRepository, NoteRepositoryError, SessionRecorder, SessionRecorderError,
    SessionRepository, SessionRepositoryError, SettingsProvider, SharedSettings, SystemClock,
    TaskRepository, TaskRepositoryError,
};
pub use timer::{SessionCompletion, TickOutcome, TimerEngine, TimerSnapshot, TimerState};
