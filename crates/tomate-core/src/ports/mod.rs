mod clock;
mod note_repository;
mod session_recorder;
mod session_repository;
mod settings_provider;
mod task_repository;

pub use clock::{Clock, SystemClock};
pub use note_repository::{NoteRepository, NoteRepositoryError};
pub use session_recorder::{SessionRecorder, SessionRecorderError};
pub use session_repository::{SessionRepository, SessionRepositoryError};
pub use settings_provider::{SettingsProvider, SharedSettings};
pub use task_repository::{TaskRepository, TaskRepositoryError};
