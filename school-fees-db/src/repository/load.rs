use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::repository_error::RepositoryError;

/// Generic repository trait for loading entities by their ID
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement Identifiable trait
#[async_trait]
pub trait Load<DB: Database, T: Identifiable>: Send + Sync {
    /// Load an entity by its unique identifier
    ///
    /// # Returns
    /// * `Ok(T)` - The loaded entity
    /// * `Err(RepositoryError::NotFound)` - If no entity carries this id
    async fn load(&self, id: Uuid) -> Result<T, RepositoryError>;
}
