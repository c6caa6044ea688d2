use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::repository::repository_error::RepositoryError;

/// Generic repository trait for deleting multiple entities in a batch
///
/// All deletes are performed within a single transaction for atomicity.
/// Returns the number of items successfully deleted.
#[async_trait]
pub trait DeleteBatch<DB: Database>: Send + Sync {
    /// Delete multiple items by their IDs in a single transaction
    ///
    /// # Arguments
    /// * `ids` - A slice of UUIDs of the entities to delete
    /// * `audit_log_id` - The UUID of the audit log for tracking this operation
    ///
    /// # Returns
    /// * `Ok(usize)` - The number of items successfully deleted
    /// * `Err` - An error if the transaction could not be executed
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, RepositoryError>;
}
