use async_trait::async_trait;
use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::{LoadBatch, RepositoryError};
use sqlx::Postgres;
use std::collections::HashMap;
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &FeeRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<FeeModel>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fees = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let rows = sqlx::query(r#"SELECT * FROM fee WHERE id = ANY($1)"#)
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?;
            Self::hydrate(&mut **transaction, rows).await?
        };

        let mut item_map: HashMap<Uuid, FeeModel> =
            fees.into_iter().map(|fee| (fee.id, fee)).collect();
        Ok(ids.iter().map(|id| item_map.remove(id)).collect())
    }
}

#[async_trait]
impl LoadBatch<Postgres, FeeModel> for FeeRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<FeeModel>>, RepositoryError> {
        Self::load_batch_impl(self, ids).await
    }
}
