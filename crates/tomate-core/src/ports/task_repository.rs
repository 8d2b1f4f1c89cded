use thiserror::Error;

use crate::domain::{Task, TaskId};

#[derive(Error, Debug)]
pub enum TaskRepositoryError {
    #[error("task not found: {id}")]
    NotFound { id: TaskId },

    #[error("storage error: {message}")]
    Storage { message: String },
}

pub trait TaskRepository: Send + Sync {
    fn save(&self, task: &mut Task) -> Result<TaskId, TaskRepositoryError>;

    fn update(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    fn find_by_id(&self, id: TaskId) -> Result<Task, TaskRepositoryError>;

    fn find_all(&self) -> Result<Vec<Task>, TaskRepositoryError>;

    fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError>;

    fn increment_pomodoro_count(&self, id: TaskId) -> Result<u32, TaskRepositoryError>;

    fn count_completed(&self) -> Result<u32, TaskRepositoryError>;
}
