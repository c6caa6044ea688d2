use async_trait::async_trait;
use school_fees_db::repository::{DeleteBatch, LoadBatch, RepositoryError};
use school_fees_db::utils::hash_as_i64;
use sqlx::Postgres;
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn delete_batch_impl(
        repo: &FeeRepositoryImpl,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, RepositoryError> {
        let audit_log_id = audit_log_id
            .ok_or_else(|| RepositoryError::Other("audit_log_id is required for FeeModel".to_string()))?;
        if ids.is_empty() {
            return Ok(0);
        }

        let entities_to_delete = repo.load_batch(ids).await?;
        let mut deleted_count = 0;

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        for entity in entities_to_delete.into_iter().flatten() {
            // Final version of the chain, recorded before the row disappears
            let mut final_audit_entity = entity.clone();
            final_audit_entity.antecedent_hash = entity.hash;
            final_audit_entity.antecedent_audit_log_id = entity.audit_log_id.ok_or_else(|| {
                RepositoryError::Other("Entity must have audit_log_id for deletion".to_string())
            })?;
            final_audit_entity.audit_log_id = Some(audit_log_id);
            final_audit_entity.hash = 0;
            final_audit_entity.hash =
                hash_as_i64(&final_audit_entity).map_err(RepositoryError::Hashing)?;

            Self::insert_audit(&mut **transaction, &final_audit_entity).await?;

            let result = sqlx::query(r#"DELETE FROM fee WHERE id = $1"#)
                .bind(entity.id)
                .execute(&mut **transaction)
                .await?;
            deleted_count += result.rows_affected() as usize;
        }

        Ok(deleted_count)
    }
}

#[async_trait]
impl DeleteBatch<Postgres> for FeeRepositoryImpl {
    async fn delete_batch(
        &self,
        ids: &[Uuid],
        audit_log_id: Option<Uuid>,
    ) -> Result<usize, RepositoryError> {
        Self::delete_batch_impl(self, ids, audit_log_id).await
    }
}
