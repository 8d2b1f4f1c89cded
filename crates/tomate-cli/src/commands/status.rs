use anyhow::Result;
use serde::Serialize;
use tomate_adapters::SqliteTaskRepository;
use tomate_core::{Config, TaskId, TaskRepository, Translator};
use tomate_protocol::{Request, Response, TimerMode, TimerSnapshot, TimerState};

use super::translator;
use crate::client::{ClientError, DaemonClient};

const PROGRESS_BAR_WIDTH: usize = 20;

#[derive(Serialize)]
struct StatusOutput {
    mode: TimerMode,
    state: &'static str,
    remaining_seconds: u64,
    remaining_formatted: String,
    total_seconds: u64,
    progress: f64,
    sessions_completed_in_cycle: u32,
    current_task_id: Option<TaskId>,
}

pub async fn execute(json: bool) -> Result<()> {
    let translator = translator();
    let client = DaemonClient::new();

    match client.send(Request::GetStatus).await {
        Ok(Response::Status(snapshot)) => {
            if json {
                print_json(&snapshot)?;
            } else {
                print_formatted(&snapshot, &translator);
            }
        }
        Ok(Response::Error { message }) => {
            report_error(json, &message);
            std::process::exit(1);
        }
        Ok(_) => {
            report_error(json, &translator.get("error.unexpected_response"));
            std::process::exit(1);
        }
        Err(ClientError::DaemonNotRunning) => {
            if json {
                println!(r#"{{"error": "daemon not running", "running": false}}"#);
            } else {
                println!("{}", translator.get("error.daemon_not_running"));
            }
        }
        Err(ClientError::Timeout) => {
            report_error(json, &translator.get("error.connection_timeout"));
            std::process::exit(1);
        }
        Err(error) => {
            report_error(json, &error.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn report_error(json: bool, message: &str) {
    if json {
        println!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("{}", message);
    }
}

fn print_json(snapshot: &TimerSnapshot) -> Result<()> {
    let state = &snapshot.state;
    let output = StatusOutput {
        mode: state.mode,
        state: state_name(state),
        remaining_seconds: state.remaining_seconds,
        remaining_formatted: format_clock(state.remaining_seconds),
        total_seconds: snapshot.total_seconds,
        progress: snapshot.progress(),
        sessions_completed_in_cycle: state.sessions_completed_in_cycle,
        current_task_id: state.current_task_id,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_formatted(snapshot: &TimerSnapshot, translator: &Translator) {
    let state = &snapshot.state;

    println!("{}", translator.get(&format!("status.{}", state_name(state))));
    println!(
        "   {}: {}",
        translator.get("status.mode"),
        translator.mode(state.mode)
    );
    println!(
        "   {}: {}",
        translator.get("status.remaining"),
        format_clock(state.remaining_seconds)
    );
    println!(
        "   {}: {} {:>3.0}%",
        translator.get("status.progress"),
        progress_bar(snapshot.progress(), PROGRESS_BAR_WIDTH),
        snapshot.progress() * 100.0
    );
    println!(
        "   {}: {}",
        translator.get("status.cycle"),
        state.sessions_completed_in_cycle
    );

    let task = match state.current_task_id {
        Some(id) => task_label(id),
        None => translator.get("status.no_task"),
    };
    println!("   {}: {}", translator.get("status.task"), task);
}

fn task_label(id: TaskId) -> String {
    let database_path = Config::database_path();
    if !database_path.exists() {
        return format!("#{}", id);
    }

    SqliteTaskRepository::new(&database_path)
        .ok()
        .and_then(|repository| repository.find_by_id(id).ok())
        .map(|task| format!("#{} {}", id, task.title))
        .unwrap_or_else(|| format!("#{}", id))
}

fn state_name(state: &TimerState) -> &'static str {
    if state.is_running {
        "running"
    } else if state.is_paused {
        "paused"
    } else {
        "stopped"
    }
}

fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn format_clock_keeps_long_sessions_in_minutes() {
        assert_eq!(format_clock(90 * 60), "90:00");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(0.5, 4), "[##..]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(3.0, 4), "[####]");
    }

    #[test]
    fn state_name_prefers_running_then_paused() {
        let mut state = TimerState::initial(1500);
        assert_eq!(state_name(&state), "stopped");

        state.is_paused = true;
        assert_eq!(state_name(&state), "paused");

        state.is_paused = false;
        state.is_running = true;
        assert_eq!(state_name(&state), "running");
    }

    #[test]
    fn every_state_name_has_a_translation() {
        let translator = Translator::default();

        for name in ["running", "paused", "stopped"] {
            let key = format!("status.{}", name);
            assert_ne!(translator.get(&key), key);
        }
    }
}
