//! Tomate protocol definitions for CLI-daemon communication
//!
//! Frames are a little-endian `u32` length followed by a bincode payload.

use serde::{Deserialize, Serialize};

pub use tomate_core::{TaskId, TimerMode, TimerSettings, TimerSnapshot, TimerState};

/// Upper bound on a single frame, guards against garbage length prefixes.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Requests sent from CLI to daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Ping the daemon to check if it's alive
    Ping,
    /// Get the current timer snapshot
    GetStatus,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Restore the full duration of the current mode
    Reset,
    /// Jump to another mode, stopped
    SwitchMode { mode: TimerMode },
    /// Attach (or detach with `None`) the task credited for focus sessions
    SelectTask { task_id: Option<TaskId> },
    /// Read the settings the daemon is running with
    GetSettings,
    /// Replace the daemon settings; applies from the next transition or reset
    UpdateSettings { settings: TimerSettings },
}

/// Responses sent from daemon to CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Pong response to ping
    Pong,
    /// Generic success acknowledgment
    Ok,
    /// Error response with message
    Error { message: String },
    /// Timer state plus the total length of the current mode
    Status(TimerSnapshot),
    /// Settings currently in effect
    Settings(TimerSettings),
}
