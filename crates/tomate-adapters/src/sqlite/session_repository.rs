use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use tomate_core::{SessionId, SessionRecord, SessionRepository, SessionRepositoryError, TimerMode};

use super::{format_timestamp, parse_timestamp};

const SELECT_COLUMNS: &str =
    "SELECT id, mode, duration_minutes, started_at, ended_at, task_id, completed FROM sessions";

pub struct SqliteSessionRepository {
    connection: Mutex<Connection>,
}

impl SqliteSessionRepository {
    pub fn new(path: &Path) -> Result<Self, SessionRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;
        Self::with_connection(connection)
    }

    pub fn in_memory() -> Result<Self, SessionRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SessionRepositoryError> {
        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), SessionRepositoryError> {
        self.lock()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id INTEGER PRIMARY KEY,
                    mode TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL,
                    started_at TEXT NOT NULL,
                    ended_at TEXT NOT NULL,
                    task_id INTEGER,
                    completed INTEGER NOT NULL DEFAULT 1
                );
                CREATE INDEX IF NOT EXISTS sessions_started_at ON sessions (started_at);",
            )
            .map_err(storage_error)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SessionRepositoryError> {
        self.connection
            .lock()
            .map_err(|_| SessionRepositoryError::Storage {
                message: "connection lock poisoned".to_string(),
            })
    }

    fn query_records(
        &self,
        sql: &str,
        parameters: impl rusqlite::Params,
    ) -> Result<Vec<SessionRecord>, SessionRepositoryError> {
        let connection = self.lock()?;
        let mut statement = connection.prepare(sql).map_err(storage_error)?;

        let records = statement
            .query_map(parameters, row_to_record)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(records)
    }
}

impl SessionRepository for SqliteSessionRepository {
    fn save(&self, record: &mut SessionRecord) -> Result<SessionId, SessionRepositoryError> {
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT INTO sessions (mode, duration_minutes, started_at, ended_at, task_id, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.mode.as_str(),
                    record.duration_minutes,
                    format_timestamp(&record.started_at),
                    format_timestamp(&record.ended_at),
                    record.task_id,
                    record.completed,
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        record.id = Some(id);

        Ok(id)
    }

    fn find_by_id(&self, id: SessionId) -> Result<SessionRecord, SessionRepositoryError> {
        let connection = self.lock()?;

        connection
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_record,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => SessionRepositoryError::NotFound { id },
                other => storage_error(other),
            })
    }

    fn find_all(&self) -> Result<Vec<SessionRecord>, SessionRepositoryError> {
        self.query_records(&format!("{} ORDER BY started_at DESC", SELECT_COLUMNS), [])
    }

    fn find_completed_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, SessionRepositoryError> {
        self.query_records(
            &format!(
                "{} WHERE completed = 1 AND started_at >= ?1 ORDER BY started_at DESC",
                SELECT_COLUMNS
            ),
            params![format_timestamp(&since)],
        )
    }

    fn count_completed_focus(&self) -> Result<u32, SessionRepositoryError> {
        let connection = self.lock()?;

        connection
            .query_row(
                "SELECT COUNT(*) FROM sessions WHERE completed = 1 AND mode = ?1",
                params![TimerMode::Focus.as_str()],
                |row| row.get(0),
            )
            .map_err(storage_error)
    }

    fn clear(&self) -> Result<u32, SessionRepositoryError> {
        let connection = self.lock()?;

        let deleted = connection
            .execute("DELETE FROM sessions", [])
            .map_err(storage_error)?;

        Ok(deleted as u32)
    }

    fn delete(&self, id: SessionId) -> Result<(), SessionRepositoryError> {
        let connection = self.lock()?;

        let rows_affected = connection
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(SessionRepositoryError::NotFound { id });
        }

        Ok(())
    }
}

fn storage_error(error: rusqlite::Error) -> SessionRepositoryError {
    SessionRepositoryError::Storage {
        message: error.to_string(),
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SessionRecord> {
    let mode_text: String = row.get(1)?;
    let mode = mode_text.parse::<TimerMode>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let started_at: String = row.get(3)?;
    let ended_at: String = row.get(4)?;

    Ok(SessionRecord {
        id: Some(row.get(0)?),
        mode,
        duration_minutes: row.get(2)?,
        started_at: parse_timestamp(3, &started_at)?,
        ended_at: parse_timestamp(4, &ended_at)?,
        task_id: row.get(5)?,
        completed: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn focus_ending_at(ended_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord::completed(TimerMode::Focus, 25, ended_at, None)
    }

    #[test]
    fn save_and_retrieve_record() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        let ended_at = Utc.with_ymd_and_hms(2024, 4, 2, 9, 25, 0).unwrap();

        let mut record = SessionRecord::completed(TimerMode::LongBreak, 15, ended_at, Some(7));
        let id = repository.save(&mut record).unwrap();

        assert!(id > 0);
        assert_eq!(record.id, Some(id));

        let retrieved = repository.find_by_id(id).unwrap();
        assert_eq!(retrieved, record);
    }

    #[test]
    fn find_by_id_reports_missing_record() {
        let repository = SqliteSessionRepository::in_memory().unwrap();

        let result = repository.find_by_id(99);

        assert!(matches!(
            result,
            Err(SessionRepositoryError::NotFound { id: 99 })
        ));
    }

    #[test]
    fn find_completed_since_filters_by_start() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();

        repository
            .save(&mut focus_ending_at(now - Duration::days(3)))
            .unwrap();
        repository
            .save(&mut focus_ending_at(now - Duration::hours(1)))
            .unwrap();
        repository.save(&mut focus_ending_at(now)).unwrap();

        let records = repository
            .find_completed_since(now - Duration::days(1))
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].started_at > records[1].started_at);
    }

    #[test]
    fn find_completed_since_excludes_incomplete_records() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();

        let mut abandoned = focus_ending_at(now);
        abandoned.completed = false;
        repository.save(&mut abandoned).unwrap();
        repository.save(&mut focus_ending_at(now)).unwrap();

        let records = repository
            .find_completed_since(now - Duration::days(1))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].completed);
    }

    #[test]
    fn count_completed_focus_ignores_breaks() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        let now = Utc::now();

        repository.save(&mut focus_ending_at(now)).unwrap();
        repository.save(&mut focus_ending_at(now)).unwrap();
        repository
            .save(&mut SessionRecord::completed(TimerMode::ShortBreak, 5, now, None))
            .unwrap();

        assert_eq!(repository.count_completed_focus().unwrap(), 2);
        assert_eq!(repository.find_all().unwrap().len(), 3);
    }

    #[test]
    fn delete_removes_record() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        let mut record = focus_ending_at(Utc::now());
        let id = repository.save(&mut record).unwrap();

        repository.delete(id).unwrap();

        assert!(matches!(
            repository.delete(id),
            Err(SessionRepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_returns_deleted_count() {
        let repository = SqliteSessionRepository::in_memory().unwrap();
        repository.save(&mut focus_ending_at(Utc::now())).unwrap();
        repository.save(&mut focus_ending_at(Utc::now())).unwrap();

        assert_eq!(repository.clear().unwrap(), 2);
        assert!(repository.find_all().unwrap().is_empty());
    }
}
