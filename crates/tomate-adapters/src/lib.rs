//! Tomate adapters - Infrastructure implementations
//!
//! Concrete implementations of the ports defined in tomate-core: SQLite
//! storage for sessions, tasks and notes, plus test doubles for the timer
//! engine collaborators.

pub mod sqlite;
pub mod testing;

pub use sqlite::{SqliteNoteRepository, SqliteSessionRepository, SqliteTaskRepository};
pub use testing::{FailingSessionRecorder, ManualClock, RecordingSessionRecorder};
