use async_trait::async_trait;
use uuid::Uuid;

use crate::models::identity::UserRef;
use crate::repository::repository_error::RepositoryError;

/// Read access to the identity service: user roles and the parent/student graph
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRef>, RepositoryError>;
}
