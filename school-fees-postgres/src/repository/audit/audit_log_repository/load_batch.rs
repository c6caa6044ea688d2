use async_trait::async_trait;
use school_fees_db::models::audit::AuditLogModel;
use school_fees_db::repository::{LoadBatch, RepositoryError};
use sqlx::Postgres;
use std::collections::HashMap;
use uuid::Uuid;

use super::repo_impl::AuditLogRepositoryImpl;
use crate::executor::consumed;

impl AuditLogRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &AuditLogRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AuditLogModel>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = sqlx::query_as::<_, AuditLogModel>(
            r#"
            SELECT id, updated_at, updated_by_user_id
            FROM audit_log
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids);

        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            query.fetch_all(&mut **transaction).await?
        };

        let mut map: HashMap<Uuid, AuditLogModel> =
            rows.into_iter().map(|model| (model.id, model)).collect();
        Ok(ids.iter().map(|id| map.remove(id)).collect())
    }
}

#[async_trait]
impl LoadBatch<Postgres, AuditLogModel> for AuditLogRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AuditLogModel>>, RepositoryError> {
        Self::load_batch_impl(self, ids).await
    }
}
