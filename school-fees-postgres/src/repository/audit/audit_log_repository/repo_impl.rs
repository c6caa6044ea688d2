use async_trait::async_trait;
use school_fees_db::models::audit::AuditLogModel;
use school_fees_db::repository::{AuditLogRepository, RepositoryError};
use sqlx::Postgres;

use crate::executor::Executor;

pub struct AuditLogRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AuditLogRepository<Postgres> for AuditLogRepositoryImpl {
    async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, RepositoryError> {
        Self::create_impl(self, audit_log).await
    }
}
