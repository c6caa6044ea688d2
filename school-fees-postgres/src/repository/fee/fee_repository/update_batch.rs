use async_trait::async_trait;
use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::{RepositoryError, UpdateBatch};
use sqlx::Postgres;
use tracing::{debug, warn};
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn update_batch_impl(
        repo: &FeeRepositoryImpl,
        items: Vec<FeeModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        let mut res = Vec::with_capacity(items.len());
        for mut item in items {
            let changed = item
                .seal_for_update(audit_log_id)
                .map_err(RepositoryError::Hashing)?;
            if !changed {
                res.push(item);
                continue;
            }

            // The row must still carry the hash the item was read with.
            let result = sqlx::query(
                r#"
                UPDATE fee SET
                fee_type = $3,
                amount = $4,
                paid_amount = $5,
                due_date = $6,
                status = $7,
                payment_method = $8,
                transaction_id = $9,
                payment_date = $10,
                academic_year = $11,
                semester = $12,
                description = $13,
                updated_at = $14,
                antecedent_hash = $15,
                antecedent_audit_log_id = $16,
                hash = $17,
                audit_log_id = $18
                WHERE id = $1 AND hash = $2
                "#,
            )
            .bind(item.id)
            .bind(item.antecedent_hash)
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
            .bind(item.updated_at)
            .bind(item.antecedent_hash)
            .bind(item.antecedent_audit_log_id)
            .bind(item.hash)
            .bind(item.audit_log_id)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM fee WHERE id = $1)"#)
                    .bind(item.id)
                    .fetch_one(&mut **transaction)
                    .await?;
                if !exists {
                    return Err(RepositoryError::NotFound(item.id));
                }
                warn!(fee_id = %item.id, expected_hash = item.antecedent_hash, "stale fee write rejected");
                return Err(RepositoryError::Conflict { id: item.id });
            }

            Self::insert_payments(&mut **transaction, &item).await?;
            Self::insert_audit(&mut **transaction, &item).await?;

            debug!(fee_id = %item.id, hash = item.hash, "fee updated");
            res.push(item);
        }
        Ok(res)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, FeeModel> for FeeRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<FeeModel>,
        audit_log_id: Uuid,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::create_test_fee;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use rust_decimal::Decimal;
    use school_fees_api::{FeeStatus, PaymentMethod};
    use school_fees_db::ledger::{FeeLedger, PaymentDetails};
    use school_fees_db::repository::{AuditLogRepository, CreateBatch, Load, RepositoryError, UpdateBatch};
    use school_fees_db::{Clock, SystemClock};
    use serial_test::serial;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_update_batch_appends_payments() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let fee_repo = &ctx.session.fee_repository;
        let audit_repo = &ctx.session.audit_log_repository;
        let now = SystemClock.now();

        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        let mut fee = fee_repo
            .create_batch(vec![create_test_fee(Uuid::new_v4(), Decimal::from(200))], Some(audit_log.id))
            .await?
            .remove(0);
        let created_hash = fee.hash;

        FeeLedger::apply_payment(&mut fee, Decimal::from(50), PaymentDetails::new(PaymentMethod::Cash), now)?;
        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        let mut fee = fee_repo.update_batch(vec![fee], audit_log.id).await?.remove(0);
        assert_eq!(fee.antecedent_hash, created_hash);

        FeeLedger::apply_payment(&mut fee, Decimal::from(150), PaymentDetails::new(PaymentMethod::Online), now)?;
        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        let fee = fee_repo.update_batch(vec![fee], audit_log.id).await?.remove(0);

        let loaded = fee_repo.load(fee.id).await?;
        assert_eq!(loaded.status, FeeStatus::Paid);
        assert_eq!(loaded.payment_history.len(), 2);
        assert_eq!(loaded.history_total(), loaded.paid_amount);
        assert_eq!(loaded.hash, fee.hash);
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_update_batch_rejects_stale_hash() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let fee_repo = &ctx.session.fee_repository;
        let audit_repo = &ctx.session.audit_log_repository;

        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        let read = fee_repo
            .create_batch(vec![create_test_fee(Uuid::new_v4(), Decimal::from(100))], Some(audit_log.id))
            .await?
            .remove(0);

        let mut first = read.clone();
        first.paid_amount = Decimal::from(10);
        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        fee_repo.update_batch(vec![first], audit_log.id).await?;

        let mut stale = read;
        stale.paid_amount = Decimal::from(20);
        let audit_log = audit_repo.create(&create_test_audit_log()).await?;
        let result = fee_repo.update_batch(vec![stale.clone()], audit_log.id).await;

        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, RepositoryError::Conflict { id } if id == stale.id));
        assert_eq!(fee_repo.load(stale.id).await?.paid_amount, Decimal::from(10));
        Ok(())
    }
}
