use chrono::NaiveDate;
use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::RepositoryError;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    /// Same predicate as `FeeLedger::is_overdue_candidate`
    pub(super) async fn find_overdue_impl(
        repo: &FeeRepositoryImpl,
        today: NaiveDate,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM fee
            WHERE due_date < $1 AND status <> 'paid'
            ORDER BY due_date ASC, created_at ASC, id ASC
            "#,
        )
        .bind(today)
        .fetch_all(&mut **transaction)
        .await?;

        Self::hydrate(&mut **transaction, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::create_test_fee;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use school_fees_api::FeeStatus;
    use school_fees_db::repository::{AuditLogRepository, CreateBatch, FeeRepository};
    use school_fees_db::FeeLedger;
    use serial_test::serial;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_find_overdue() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let fee_repo = &ctx.session.fee_repository;
        let audit_log = ctx.session.audit_log_repository.create(&create_test_audit_log()).await?;

        let student_id = Uuid::new_v4();
        let reference = create_test_fee(student_id, Decimal::from(100)).due_date;
        let today = reference + Duration::days(1);

        let mut stamped = create_test_fee(student_id, Decimal::from(100));
        stamped.status = FeeStatus::Overdue;
        let mut partial = create_test_fee(student_id, Decimal::from(100));
        partial.paid_amount = Decimal::from(10);
        partial.status = FeeStatus::Partial;
        let mut paid = create_test_fee(student_id, Decimal::from(100));
        paid.paid_amount = Decimal::from(100);
        paid.status = FeeStatus::Paid;
        let mut future = create_test_fee(student_id, Decimal::from(100));
        future.due_date = today + Duration::days(1);

        fee_repo
            .create_batch(
                vec![stamped.clone(), partial.clone(), paid, future],
                Some(audit_log.id),
            )
            .await?;

        let overdue: Vec<_> = fee_repo
            .find_overdue(today)
            .await?
            .into_iter()
            .filter(|f| f.student_id == student_id)
            .collect();

        assert_eq!(overdue.len(), 2);
        assert!(overdue.iter().any(|f| f.id == stamped.id));
        assert!(overdue.iter().all(|f| FeeLedger::is_overdue_candidate(f, today)));
        Ok(())
    }
}
