use std::sync::Mutex;
use tomate_core::{SessionRecord, SessionRecorder, SessionRecorderError};

/// Keeps every record it receives, in order.
pub struct RecordingSessionRecorder {
    records: Mutex<Vec<SessionRecord>>,
}

impl RecordingSessionRecorder {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<SessionRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for RecordingSessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRecorder for RecordingSessionRecorder {
    fn record(&self, record: SessionRecord) -> Result<(), SessionRecorderError> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tomate_core::TimerMode;

    #[test]
    fn keeps_records_in_order() {
        let recorder = RecordingSessionRecorder::new();

        recorder
            .record(SessionRecord::completed(TimerMode::Focus, 25, Utc::now(), None))
            .unwrap();
        recorder
            .record(SessionRecord::completed(TimerMode::ShortBreak, 5, Utc::now(), None))
            .unwrap();

        let modes: Vec<TimerMode> = recorder.records().iter().map(|r| r.mode).collect();
        assert_eq!(modes, vec![TimerMode::Focus, TimerMode::ShortBreak]);
        assert_eq!(recorder.count(), 2);
    }
}
