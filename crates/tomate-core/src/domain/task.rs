use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Error, Debug)]
#[error("unknown priority: {0}. Available priorities: low, medium, high")]
pub struct UnknownPriorityError(String);

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(UnknownPriorityError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub completed: bool,
    pub pomodoro_count: u32,
    pub estimated_pomodoros: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: String, priority: TaskPriority, estimated_pomodoros: u32) -> Self {
        Self {
            id: None,
            title,
            description: None,
            priority,
            completed: false,
            pomodoro_count: 0,
            estimated_pomodoros,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn complete(&mut self) {
        if !self.completed {
            self.completed = true;
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    pub fn remaining_pomodoros(&self) -> u32 {
        self.estimated_pomodoros.saturating_sub(self.pomodoro_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_open() {
        let task = Task::new("write report".to_string(), TaskPriority::High, 4);

        assert!(task.id.is_none());
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(task.pomodoro_count, 0);
        assert_eq!(task.remaining_pomodoros(), 4);
    }

    #[test]
    fn complete_then_reopen_clears_timestamp() {
        let mut task = Task::new("review".to_string(), TaskPriority::Low, 1);

        task.complete();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        task.reopen();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn complete_twice_keeps_first_timestamp() {
        let mut task = Task::new("review".to_string(), TaskPriority::Low, 1);

        task.complete();
        let first = task.completed_at;
        task.complete();

        assert_eq!(task.completed_at, first);
    }

    #[test]
    fn remaining_pomodoros_never_underflows() {
        let mut task = Task::new("spike".to_string(), TaskPriority::Medium, 2);
        task.pomodoro_count = 5;

        assert_eq!(task.remaining_pomodoros(), 0);
    }

    #[test]
    fn priority_parses_case_insensitive() {
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }
}
