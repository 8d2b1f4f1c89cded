//! Timer/session state engine.
//!
//! The engine is a synchronous state machine with no internal clock. Its
//! host calls [`TimerEngine::tick`] once per second while the timer runs.

mod engine;
mod state;

pub use engine::{SessionCompletion, TickOutcome, TimerEngine};
pub use state::{TimerSnapshot, TimerState};
