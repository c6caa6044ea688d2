use school_fees_db::models::audit::AuditLogModel;
use school_fees_db::repository::RepositoryError;

use super::repo_impl::AuditLogRepositoryImpl;
use crate::executor::consumed;

impl AuditLogRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &AuditLogRepositoryImpl,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, RepositoryError> {
        let query = sqlx::query(
            r#"
            INSERT INTO audit_log (id, updated_at, updated_by_user_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(audit_log.id)
        .bind(audit_log.updated_at)
        .bind(audit_log.updated_by_user_id);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        query.execute(&mut **transaction).await?;

        Ok(audit_log.clone())
    }
}
