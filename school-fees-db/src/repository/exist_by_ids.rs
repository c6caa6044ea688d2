use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::repository::repository_error::RepositoryError;

/// Existence check for several entities at once.
///
/// Returns one `(id, exists)` pair per requested id, in request order.
#[async_trait]
pub trait ExistByIds<DB: Database>: Send + Sync {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, RepositoryError>;
}
