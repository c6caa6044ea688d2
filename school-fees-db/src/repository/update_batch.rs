use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::auditable::Auditable;
use crate::repository::repository_error::RepositoryError;

/// Generic repository trait for updating multiple entities in a batch
///
/// All updates are performed within a single transaction for atomicity.
/// Only updates items that have changed (based on hash comparison).
/// Each write is conditional on the stored hash still matching the hash the
/// item was read with; a mismatch fails with `RepositoryError::Conflict`.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement Auditable trait
#[async_trait]
pub trait UpdateBatch<DB: Database, T: Auditable>: Send + Sync {
    /// Update multiple items in a single transaction
    ///
    /// # Arguments
    /// * `items` - A vector of entities to update, each carrying the hash it was loaded with
    /// * `audit_log_id` - The UUID of the audit log for tracking this operation
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of updated entities
    /// * `Err` - An error if the transaction could not be executed
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Uuid,
    ) -> Result<Vec<T>, RepositoryError>;
}
