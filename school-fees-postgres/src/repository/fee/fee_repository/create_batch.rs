use async_trait::async_trait;
use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::{CreateBatch, RepositoryError};
use sqlx::Postgres;
use tracing::debug;
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &FeeRepositoryImpl,
        items: Vec<FeeModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let audit_log_id = audit_log_id
            .ok_or_else(|| RepositoryError::Other("audit_log_id is required for FeeModel".to_string()))?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        let mut saved_items = Vec::with_capacity(items.len());
        for mut item in items {
            item.seal_for_create(audit_log_id)
                .map_err(RepositoryError::Hashing)?;

            sqlx::query(
                r#"
                INSERT INTO fee
                (id, student_id, fee_type, amount, paid_amount, due_date, status, payment_method,
                 transaction_id, payment_date, academic_year, semester, description, created_by,
                 created_at, updated_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
                "#,
            )
            .bind(item.id)
            .bind(item.student_id)
            .bind(item.fee_type)
            .bind(item.amount)
            .bind(item.paid_amount)
            .bind(item.due_date)
            .bind(item.status)
            .bind(item.payment_method)
            .bind(item.transaction_id.as_deref())
            .bind(item.payment_date)
            .bind(item.academic_year.as_str())
            .bind(item.semester)
            .bind(item.description.as_deref())
            .bind(item.created_by)
            .bind(item.created_at)
            .bind(item.updated_at)
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            Self::insert_payments(&mut **transaction, &item).await?;
            Self::insert_audit(&mut **transaction, &item).await?;

            debug!(fee_id = %item.id, hash = item.hash, "fee inserted");
            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, FeeModel> for FeeRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<FeeModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
