use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{SessionId, SessionRecord};

#[derive(Error, Debug)]
pub enum SessionRepositoryError {
    #[error("session not found: {id}")]
    NotFound { id: SessionId },

    #[error("storage error: {message}")]
    Storage { message: String },
}

pub trait SessionRepository: Send + Sync {
    fn save(&self, record: &mut SessionRecord) -> Result<SessionId, SessionRepositoryError>;

    fn find_by_id(&self, id: SessionId) -> Result<SessionRecord, SessionRepositoryError>;

    fn find_all(&self) -> Result<Vec<SessionRecord>, SessionRepositoryError>;

    fn find_completed_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, SessionRepositoryError>;

    fn count_completed_focus(&self) -> Result<u32, SessionRepositoryError>;

    fn clear(&self) -> Result<u32, SessionRepositoryError>;

    fn delete(&self, id: SessionId) -> Result<(), SessionRepositoryError>;
}
