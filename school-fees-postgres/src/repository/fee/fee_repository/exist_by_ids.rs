use async_trait::async_trait;
use school_fees_db::repository::{ExistByIds, RepositoryError};
use sqlx::Postgres;
use std::collections::HashSet;
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn exist_by_ids_impl(
        repo: &FeeRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, bool)>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<Uuid> = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query_scalar(r#"SELECT id FROM fee WHERE id = ANY($1)"#)
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let found: HashSet<Uuid> = found.into_iter().collect();
        Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
    }
}

#[async_trait]
impl ExistByIds<Postgres> for FeeRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, RepositoryError> {
        Self::exist_by_ids_impl(self, ids).await
    }
}
