use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::repository::repository_error::RepositoryError;

/// Generic repository trait for creating multiple entities in a batch
///
/// All creates are performed within a single transaction for atomicity.
/// Returns saved items with any generated fields populated.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement Identifiable trait
///
/// # Example
/// ```ignore
/// impl CreateBatch<Postgres, FeeModel> for FeeRepositoryImpl {
///     async fn create_batch(&self, items: Vec<FeeModel>, audit_log_id: Option<Uuid>) -> Result<Vec<FeeModel>, RepositoryError> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<DB: Database, T: Identifiable>: Send + Sync {
    /// Save multiple items in a single transaction
    ///
    /// # Arguments
    /// * `items` - A vector of entities to create
    /// * `audit_log_id` - The UUID of the audit log for tracking this operation
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of created entities with generated fields populated
    /// * `Err` - An error if the transaction could not be executed
    async fn create_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<T>, RepositoryError>;
}
