use thiserror::Error;

use crate::domain::{Note, NoteId};

#[derive(Error, Debug)]
pub enum NoteRepositoryError {
    #[error("note not found: {id}")]
    NotFound { id: NoteId },

    #[error("storage error: {message}")]
    Storage { message: String },
}

pub trait NoteRepository: Send + Sync {
    fn save(&self, note: &mut Note) -> Result<NoteId, NoteRepositoryError>;

    fn update(&self, note: &Note) -> Result<(), NoteRepositoryError>;

    fn find_by_id(&self, id: NoteId) -> Result<Note, NoteRepositoryError>;

    fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError>;

    fn delete(&self, id: NoteId) -> Result<(), NoteRepositoryError>;
}
