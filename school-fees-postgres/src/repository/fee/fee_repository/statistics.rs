use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, Semester};
use school_fees_db::models::fee::{FeeStatistics, StatusBreakdown};
use school_fees_db::repository::RepositoryError;
use sqlx::Row;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn statistics_impl(
        repo: &FeeRepositoryImpl,
        academic_year: Option<&str>,
        semester: Option<Semester>,
    ) -> Result<FeeStatistics, RepositoryError> {
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query(
                r#"
                SELECT status,
                       COUNT(*) AS count,
                       COALESCE(SUM(amount), 0) AS total_amount,
                       COALESCE(SUM(paid_amount), 0) AS total_paid
                FROM fee
                WHERE ($1::varchar IS NULL OR academic_year = $1)
                  AND ($2::semester IS NULL OR semester = $2)
                GROUP BY status
                "#,
            )
            .bind(academic_year)
            .bind(semester)
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let status: FeeStatus = row.try_get("status")?;
            let breakdown = StatusBreakdown {
                count: row.try_get("count")?,
                total_amount: row.try_get::<Decimal, _>("total_amount")?,
                total_paid: row.try_get::<Decimal, _>("total_paid")?,
            };
            groups.push((status, breakdown));
        }
        FeeStatistics::from_groups(groups).ok_or_else(|| {
            RepositoryError::Other("Fee statistics exceed the decimal range".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::create_test_fee;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use rust_decimal::Decimal;
    use school_fees_api::{FeeStatus, Semester};
    use school_fees_db::repository::{AuditLogRepository, CreateBatch, FeeRepository};
    use serial_test::serial;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_statistics_aggregate() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let fee_repo = &ctx.session.fee_repository;
        let audit_log = ctx.session.audit_log_repository.create(&create_test_audit_log()).await?;

        // A year no other test writes to
        let year = format!("S{}", &Uuid::new_v4().simple().to_string()[..8]);
        let mut fees = Vec::new();
        for (amount, paid, status) in [
            (100, 100, FeeStatus::Paid),
            (200, 0, FeeStatus::Pending),
            (300, 150, FeeStatus::Partial),
        ] {
            let mut fee = create_test_fee(Uuid::new_v4(), Decimal::from(amount));
            fee.paid_amount = Decimal::from(paid);
            fee.status = status;
            fee.academic_year = year.as_str().try_into().unwrap();
            fees.push(fee);
        }
        fee_repo.create_batch(fees, Some(audit_log.id)).await?;

        let stats = fee_repo.statistics(Some(&year), None).await?;
        assert_eq!(stats.total_fees, 3);
        assert_eq!(stats.total_amount, Decimal::from(600));
        assert_eq!(stats.total_paid, Decimal::from(250));
        assert_eq!(stats.total_pending, Decimal::from(350));
        assert_eq!(stats.by_status[&FeeStatus::Partial].total_paid, Decimal::from(150));

        let summer = fee_repo.statistics(Some(&year), Some(Semester::Summer)).await?;
        assert_eq!(summer.total_fees, 0);
        Ok(())
    }
}
