use async_trait::async_trait;
use sqlx::Database;

use crate::models::audit::AuditLogModel;
use crate::repository::load_batch::LoadBatch;
use crate::repository::repository_error::RepositoryError;

/// Storage of audit logs. One audit log is created per write, before the write.
#[async_trait]
pub trait AuditLogRepository<DB: Database>: LoadBatch<DB, AuditLogModel> {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, RepositoryError>;
}
