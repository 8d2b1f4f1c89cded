mod failing_recorder;
mod manual_clock;
mod recording_recorder;

pub use failing_recorder::FailingSessionRecorder;
pub use manual_clock::ManualClock;
pub use recording_recorder::RecordingSessionRecorder;
