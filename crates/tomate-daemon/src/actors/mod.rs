mod notifier;
mod recorder;
mod timer;

pub use notifier::{NotifierActor, NotifierHandle};
pub use recorder::RecorderActor;
pub use timer::{TimerActor, TimerHandle};
