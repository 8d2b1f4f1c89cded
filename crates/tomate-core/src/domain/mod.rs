mod note;
mod session_record;
mod stats;
mod task;
mod timer_mode;
mod timer_settings;

pub use note::{Note, NoteId};
pub use session_record::{SessionId, SessionRecord};
pub use stats::Stats;
pub use task::{Task, TaskId, TaskPriority, UnknownPriorityError};
pub use timer_mode::{TimerMode, UnknownTimerModeError};
pub use timer_settings::TimerSettings;
