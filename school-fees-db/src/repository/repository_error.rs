use school_fees_api::ApiError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(Uuid),

    /// The stored row no longer carries the hash the writer read
    #[error("Concurrent modification detected for {id}")]
    Conflict { id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("{0}")]
    Other(String),
}

impl RepositoryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict { .. })
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ApiError::NotFound(format!("Fee {id} not found")),
            RepositoryError::Conflict { id } => ApiError::ConcurrencyConflict(id),
            RepositoryError::Database(e) => ApiError::DatabaseError(e.to_string()),
            RepositoryError::Hashing(e) | RepositoryError::Other(e) => ApiError::InternalError(e),
        }
    }
}
