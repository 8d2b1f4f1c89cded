use thiserror::Error;

use crate::domain::SessionRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionRecorderError {
    #[error("recorder queue is full")]
    QueueFull,

    #[error("recorder is no longer running")]
    Closed,

    #[error("recording failed: {message}")]
    Storage { message: String },
}

/// Receives every completed session exactly once.
///
/// Implementations must return quickly: the call happens on the tick path.
/// Recording is best-effort, a failure never rolls back the timer transition.
pub trait SessionRecorder: Send + Sync {
    fn record(&self, record: SessionRecord) -> Result<(), SessionRecorderError>;
}
