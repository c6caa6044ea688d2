use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use school_fees_api::Semester;
use school_fees_db::models::audit::{AuditEntityType, AuditLinkModel};
use school_fees_db::models::fee::{FeeModel, FeeStatistics, PaymentRecordModel};
use school_fees_db::repository::{
    FeeFilter, FeeRepository, Load, LoadBatch, Page, PageRequest, RepositoryError,
};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Postgres, Row};
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

/// Fees in the `fee` table, their ledger in `fee_payment` and every version in `fee_audit`
pub struct FeeRepositoryImpl {
    pub(crate) executor: Executor,
}

impl FeeRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Attaches the ledger entries to fee rows, preserving row order.
    pub(super) async fn hydrate(
        conn: &mut PgConnection,
        rows: Vec<PgRow>,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let mut fees = rows
            .iter()
            .map(FeeModel::try_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if fees.is_empty() {
            return Ok(fees);
        }

        let ids: Vec<Uuid> = fees.iter().map(|f| f.id).collect();
        let payment_rows = sqlx::query(
            r#"
            SELECT * FROM fee_payment
            WHERE fee_id = ANY($1)
            ORDER BY fee_id, sequence
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut history: HashMap<Uuid, Vec<PaymentRecordModel>> = HashMap::new();
        for row in &payment_rows {
            let fee_id: Uuid = row.try_get("fee_id")?;
            history
                .entry(fee_id)
                .or_default()
                .push(PaymentRecordModel::try_from_row(row)?);
        }
        for fee in &mut fees {
            fee.payment_history = history.remove(&fee.id).unwrap_or_default();
        }
        Ok(fees)
    }

    /// Inserts ledger entries not stored yet. Stored entries are never rewritten.
    pub(super) async fn insert_payments(
        conn: &mut PgConnection,
        fee: &FeeModel,
    ) -> Result<(), RepositoryError> {
        for payment in &fee.payment_history {
            sqlx::query(
                r#"
                INSERT INTO fee_payment
                (fee_id, sequence, amount, payment_date, payment_method, transaction_id, receipt_number, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (fee_id, sequence) DO NOTHING
                "#,
            )
            .bind(fee.id)
            .bind(payment.sequence)
            .bind(payment.amount)
            .bind(payment.payment_date)
            .bind(payment.payment_method)
            .bind(payment.transaction_id.as_deref())
            .bind(payment.receipt_number.as_deref())
            .bind(payment.notes.as_deref())
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Records a full snapshot of this version of the fee and links it to its audit log.
    pub(super) async fn insert_audit(
        conn: &mut PgConnection,
        fee: &FeeModel,
    ) -> Result<(), RepositoryError> {
        let audit_log_id = fee.audit_log_id.ok_or_else(|| {
            RepositoryError::Other("Entity must have audit_log_id for auditing".to_string())
        })?;
        let payment_history = serde_json::to_value(&fee.payment_history)
            .map_err(|e| RepositoryError::Other(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO fee_audit
            (id, student_id, fee_type, amount, paid_amount, due_date, status, payment_method,
             transaction_id, payment_date, academic_year, semester, description, created_by,
             payment_history, created_at, updated_at, antecedent_hash, antecedent_audit_log_id,
             hash, audit_log_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(fee.id)
        .bind(fee.student_id)
        .bind(fee.fee_type)
        .bind(fee.amount)
        .bind(fee.paid_amount)
        .bind(fee.due_date)
        .bind(fee.status)
        .bind(fee.payment_method)
        .bind(fee.transaction_id.as_deref())
        .bind(fee.payment_date)
        .bind(fee.academic_year.as_str())
        .bind(fee.semester)
        .bind(fee.description.as_deref())
        .bind(fee.created_by)
        .bind(payment_history)
        .bind(fee.created_at)
        .bind(fee.updated_at)
        .bind(fee.antecedent_hash)
        .bind(fee.antecedent_audit_log_id)
        .bind(fee.hash)
        .bind(audit_log_id)
        .execute(&mut *conn)
        .await?;

        let audit_link = AuditLinkModel {
            audit_log_id,
            entity_id: fee.id,
            entity_type: AuditEntityType::Fee,
        };
        sqlx::query(
            r#"
            INSERT INTO audit_link (audit_log_id, entity_id, entity_type)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(audit_link.audit_log_id)
        .bind(audit_link.entity_id)
        .bind(audit_link.entity_type)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

impl TryFromRow<PgRow> for FeeModel {
    fn try_from_row(row: &PgRow) -> Result<Self, RepositoryError> {
        Ok(FeeModel {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            fee_type: row.try_get("fee_type")?,
            amount: row.try_get("amount")?,
            paid_amount: row.try_get("paid_amount")?,
            due_date: row.try_get("due_date")?,
            status: row.try_get("status")?,
            payment_method: row.try_get("payment_method")?,
            transaction_id: get_optional_heapless_string(row, "transaction_id")?,
            payment_date: row.try_get("payment_date")?,
            academic_year: get_heapless_string(row, "academic_year")?,
            semester: row.try_get("semester")?,
            description: get_optional_heapless_string(row, "description")?,
            created_by: row.try_get("created_by")?,
            payment_history: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            antecedent_hash: row.try_get("antecedent_hash")?,
            antecedent_audit_log_id: row.try_get("antecedent_audit_log_id")?,
            hash: row.try_get("hash")?,
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

impl TryFromRow<PgRow> for PaymentRecordModel {
    fn try_from_row(row: &PgRow) -> Result<Self, RepositoryError> {
        Ok(PaymentRecordModel {
            sequence: row.try_get("sequence")?,
            amount: row.try_get("amount")?,
            payment_date: row.try_get("payment_date")?,
            payment_method: row.try_get("payment_method")?,
            transaction_id: get_optional_heapless_string(row, "transaction_id")?,
            receipt_number: get_optional_heapless_string(row, "receipt_number")?,
            notes: get_optional_heapless_string(row, "notes")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, FeeModel> for FeeRepositoryImpl {
    async fn load(&self, id: Uuid) -> Result<FeeModel, RepositoryError> {
        self.load_batch(&[id])
            .await?
            .into_iter()
            .next()
            .flatten()
            .ok_or(RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl FeeRepository<Postgres> for FeeRepositoryImpl {
    async fn find_by_filter(
        &self,
        filter: &FeeFilter,
        page: PageRequest,
    ) -> Result<Page<FeeModel>, RepositoryError> {
        Self::find_by_filter_impl(self, filter, page).await
    }

    async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<FeeModel>, RepositoryError> {
        Self::find_by_student_impl(self, student_id).await
    }

    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<FeeModel>, RepositoryError> {
        Self::find_overdue_impl(self, today).await
    }

    async fn statistics(
        &self,
        academic_year: Option<&str>,
        semester: Option<Semester>,
    ) -> Result<FeeStatistics, RepositoryError> {
        Self::statistics_impl(self, academic_year, semester).await
    }
}
