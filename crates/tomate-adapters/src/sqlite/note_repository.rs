use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};

use tomate_core::{Note, NoteId, NoteRepository, NoteRepositoryError};

use super::{format_timestamp, parse_timestamp};

pub struct SqliteNoteRepository {
    connection: Mutex<Connection>,
}

impl SqliteNoteRepository {
    pub fn new(path: &Path) -> Result<Self, NoteRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;
        Self::with_connection(connection)
    }

    pub fn in_memory() -> Result<Self, NoteRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, NoteRepositoryError> {
        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), NoteRepositoryError> {
        self.lock()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS notes (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    tags TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );",
            )
            .map_err(storage_error)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, NoteRepositoryError> {
        self.connection
            .lock()
            .map_err(|_| NoteRepositoryError::Storage {
                message: "connection lock poisoned".to_string(),
            })
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn save(&self, note: &mut Note) -> Result<NoteId, NoteRepositoryError> {
        let tags = encode_tags(&note.tags)?;
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT INTO notes (title, content, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    note.title,
                    note.content,
                    tags,
                    format_timestamp(&note.created_at),
                    format_timestamp(&note.updated_at),
                ],
            )
            .map_err(storage_error)?;

        let id = connection.last_insert_rowid();
        note.id = Some(id);

        Ok(id)
    }

    fn update(&self, note: &Note) -> Result<(), NoteRepositoryError> {
        let id = note.id.ok_or_else(|| NoteRepositoryError::Storage {
            message: "cannot update note without id".to_string(),
        })?;
        let tags = encode_tags(&note.tags)?;

        let rows_affected = self
            .lock()?
            .execute(
                "UPDATE notes SET title = ?1, content = ?2, tags = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    note.title,
                    note.content,
                    tags,
                    format_timestamp(&note.updated_at),
                    id,
                ],
            )
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(NoteRepositoryError::NotFound { id });
        }

        Ok(())
    }

    fn find_by_id(&self, id: NoteId) -> Result<Note, NoteRepositoryError> {
        self.lock()?
            .query_row(
                "SELECT id, title, content, tags, created_at, updated_at
                 FROM notes WHERE id = ?1",
                params![id],
                row_to_note,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => NoteRepositoryError::NotFound { id },
                other => storage_error(other),
            })
    }

    fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        let connection = self.lock()?;

        let mut statement = connection
            .prepare(
                "SELECT id, title, content, tags, created_at, updated_at
                 FROM notes ORDER BY updated_at DESC, id DESC",
            )
            .map_err(storage_error)?;

        let notes = statement
            .query_map([], row_to_note)
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(notes)
    }

    fn delete(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM notes WHERE id = ?1", params![id])
            .map_err(storage_error)?;

        if rows_affected == 0 {
            return Err(NoteRepositoryError::NotFound { id });
        }

        Ok(())
    }
}

fn storage_error(error: rusqlite::Error) -> NoteRepositoryError {
    NoteRepositoryError::Storage {
        message: error.to_string(),
    }
}

fn encode_tags(tags: &[String]) -> Result<String, NoteRepositoryError> {
    serde_json::to_string(tags).map_err(|error| NoteRepositoryError::Storage {
        message: error.to_string(),
    })
}

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    let tags: String = row.get(3)?;
    let tags: Vec<String> = serde_json::from_str(&tags).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Note {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        tags,
        created_at: parse_timestamp(4, &created_at)?,
        updated_at: parse_timestamp(5, &updated_at)?,
    })
}
