use std::sync::atomic::{AtomicUsize, Ordering};
use tomate_core::{SessionRecord, SessionRecorder, SessionRecorderError};

/// Rejects every record with the configured error.
pub struct FailingSessionRecorder {
    error: SessionRecorderError,
    attempts: AtomicUsize,
}

impl FailingSessionRecorder {
    pub fn storage_error() -> Self {
        Self::with_error(SessionRecorderError::Storage {
            message: "disk full".to_string(),
        })
    }

    pub fn queue_full() -> Self {
        Self::with_error(SessionRecorderError::QueueFull)
    }

    pub fn with_error(error: SessionRecorderError) -> Self {
        Self {
            error,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SessionRecorder for FailingSessionRecorder {
    fn record(&self, _record: SessionRecord) -> Result<(), SessionRecorderError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
