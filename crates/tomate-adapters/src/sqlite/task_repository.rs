use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use tomate_core::{Task, TaskId, TaskPriority, TaskRepository, TaskRepositoryError};

use super::{format_timestamp, parse_timestamp};

const SELECT_COLUMNS: &str = "SELECT id, title, description, priority, completed, pomodoro_count,
        estimated_pomodoros, created_at, completed_at FROM tasks";

pub struct SqliteTaskRepository {
    connection: Mutex<Connection>,
}

impl SqliteTaskRepository {
    pub fn new(path: &Path) -> Result<Self, TaskRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;
        Self::with_connection(connection)
    }

    pub fn in_memory() -> Result<Self, TaskRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, TaskRepositoryError> {
        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), TaskRepositoryError> {
        self.lock()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    priority TEXT NOT NULL DEFAULT 'medium',
                    completed INTEGER NOT NULL DEFAULT 0,
                    pomodoro_count INTEGER NOT NULL DEFAULT 0,
                    estimated_pomodoros INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    completed_at TEXT
                );",
            )
            .map_err(storage_error)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TaskRepositoryError> {
        self.connection
            .lock()
            .map_err(|_| TaskRepositoryError::Storage {
                message: "connection lock poisoned".to_string(),
            })
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn save(&self, task: &mut Task) -> Result<TaskId, TaskRepositoryError> {
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT INTO tasks (title, description, priority, completed, pomodoro_count,
                    estimated_pomodoros, created_at, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    task.title,
                    task.description,
                    task.priority.as_str(),
                    task.completed,
                    task.pomodoro_count,
                    task.estimated_pomodoros,
                    format_timestamp(&task.created_at),
                    task.completed_at.as_ref().map(format_timestamp),
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        task.id = Some(id);

        Ok(id)
    }

    fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let id = task.id.ok_or_else(|| TaskRepositoryError::Storage {
            message: "cannot update task without id".to_string(),
        })?;

        let connection = self.lock()?;

        let rows_affected = connection
            .execute(
                "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, completed = ?4,
                    pomodoro_count = ?5, estimated_pomodoros = ?6, completed_at = ?7
                 WHERE id = ?8",
                params![
                    task.title,
                    task.description,
                    task.priority.as_str(),
                    task.completed,
                    task.pomodoro_count,
                    task.estimated_pomodoros,
                    task.completed_at.as_ref().map(format_timestamp),
                    id,
                ],
            )
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(TaskRepositoryError::NotFound { id });
        }

        Ok(())
    }

    fn find_by_id(&self, id: TaskId) -> Result<Task, TaskRepositoryError> {
        let connection = self.lock()?;

        connection
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_task,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => TaskRepositoryError::NotFound { id },
                other => storage_error(other),
            })
    }

    fn find_all(&self) -> Result<Vec<Task>, TaskRepositoryError> {
        let connection = self.lock()?;

        let mut statement = connection
            .prepare(&format!(
                "{} ORDER BY completed ASC,
                    CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                    created_at ASC",
                SELECT_COLUMNS
            ))
            .map_err(storage_error)?;

        let tasks = statement
            .query_map([], row_to_task)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(tasks)
    }

    fn delete(&self, id: TaskId) -> Result<(), TaskRepositoryError> {
        let connection = self.lock()?;

        let rows_affected = connection
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(TaskRepositoryError::NotFound { id });
        }

        Ok(())
    }

    fn increment_pomodoro_count(&self, id: TaskId) -> Result<u32, TaskRepositoryError> {
        let connection = self.lock()?;

        let count: Option<u32> = connection
            .query_row(
                "UPDATE tasks SET pomodoro_count = pomodoro_count + 1 WHERE id = ?1
                 RETURNING pomodoro_count",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)?;

        let count = count.ok_or(TaskRepositoryError::NotFound { id })?;
        debug!(task_id = id, count, "task pomodoro count incremented");

        Ok(count)
    }

    fn count_completed(&self) -> Result<u32, TaskRepositoryError> {
        let connection = self.lock()?;

        connection
            .query_row("SELECT COUNT(*) FROM tasks WHERE completed = 1", [], |row| {
                row.get(0)
            })
            .map_err(storage_error)
    }
}

fn storage_error(error: rusqlite::Error) -> TaskRepositoryError {
    TaskRepositoryError::Storage {
        message: error.to_string(),
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let priority_text: String = row.get(3)?;
    let priority = priority_text.parse::<TaskPriority>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let created_at: String = row.get(7)?;
    let completed_at: Option<String> = row.get(8)?;

    Ok(Task {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        priority,
        completed: row.get(4)?,
        pomodoro_count: row.get(5)?,
        estimated_pomodoros: row.get(6)?,
        created_at: parse_timestamp(7, &created_at)?,
        completed_at: completed_at
            .map(|value| parse_timestamp(8, &value))
            .transpose()?,
    })
}
