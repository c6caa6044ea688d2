use chrono::{DateTime, NaiveDate, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, FeeType, FeeUpdate, PaymentMethod, Semester};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payment_record::PaymentRecordModel;
use crate::models::auditable::Auditable;
use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// A single fee obligation billed to a student, together with its payment ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub fee_type: FeeType,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
    pub status: FeeStatus,

    /// Mirrors of the most recent payment; the ledger entries remain the source of truth
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<HeaplessString<400>>,
    /// Set when the fee becomes fully paid
    pub payment_date: Option<DateTime<Utc>>,

    pub academic_year: HeaplessString<80>,
    pub semester: Semester,
    pub description: Option<HeaplessString<2000>>,
    pub created_by: Uuid,
    pub payment_history: Vec<PaymentRecordModel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Hash from the previous audit record for chain verification (0 for initial create)
    pub antecedent_hash: i64,

    /// Reference to the previous audit log entry (Uuid::nil() for initial create)
    pub antecedent_audit_log_id: Uuid,

    /// Hash of the entity with hash field set to 0
    /// - 0: for new entities not yet created or not yet hashed
    /// - Non-zero: computed hash providing tamper detection
    ///
    /// Writes are conditional on the stored hash still equal to the one read,
    /// which makes this field the optimistic concurrency token.
    pub hash: i64,

    /// Reference to the current audit log entry for this entity
    /// - None: for new entities not yet created
    /// - Some(uuid): updated on every create/update operation to reference the latest audit log
    pub audit_log_id: Option<Uuid>,
}

impl FeeModel {
    /// Sum of all ledger entries, saturating at `Decimal::MAX`.
    ///
    /// Ledger-built histories sum to `paid_amount` and never saturate.
    pub fn history_total(&self) -> Decimal {
        self.payment_history
            .iter()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.amount))
    }

    pub fn latest_payment(&self) -> Option<&PaymentRecordModel> {
        self.payment_history.last()
    }

    pub fn has_transaction(&self, transaction_id: &str) -> bool {
        self.payment_history
            .iter()
            .any(|p| p.transaction_id.as_deref() == Some(transaction_id))
    }

    /// Administrative overwrite of individual fields.
    ///
    /// Bypasses the ledger: `paid_amount` may be set to anything and no entry
    /// is appended. Status is not touched here; it is re-derived on save.
    pub fn apply_update(&mut self, update: FeeUpdate) {
        if let Some(fee_type) = update.fee_type {
            self.fee_type = fee_type;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(paid_amount) = update.paid_amount {
            self.paid_amount = paid_amount;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(academic_year) = update.academic_year {
            self.academic_year = academic_year;
        }
        if let Some(semester) = update.semester {
            self.semester = semester;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
    }

    /// Stamps the audit fields of a fee about to be inserted.
    pub fn seal_for_create(&mut self, audit_log_id: Uuid) -> Result<(), String> {
        let mut entity_for_hashing = self.clone();
        entity_for_hashing.hash = 0;
        entity_for_hashing.audit_log_id = Some(audit_log_id);

        self.hash = hash_as_i64(&entity_for_hashing)?;
        self.audit_log_id = Some(audit_log_id);
        Ok(())
    }

    /// Chains the audit fields of a fee about to be updated.
    ///
    /// Returns `false` when the content is unchanged and no write is needed.
    /// On `true`, `antecedent_hash` holds the hash the stored row must still carry.
    pub fn seal_for_update(&mut self, audit_log_id: Uuid) -> Result<bool, String> {
        let previous_hash = self.hash;
        let previous_audit_log_id = self
            .audit_log_id
            .ok_or_else(|| "Entity must have audit_log_id for update".to_string())?;

        let mut entity_for_hashing = self.clone();
        entity_for_hashing.hash = 0;
        if hash_as_i64(&entity_for_hashing)? == previous_hash {
            return Ok(false);
        }

        self.antecedent_hash = previous_hash;
        self.antecedent_audit_log_id = previous_audit_log_id;
        self.audit_log_id = Some(audit_log_id);
        self.hash = 0;
        self.hash = hash_as_i64(&*self)?;
        Ok(true)
    }
}

impl Identifiable for FeeModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Auditable for FeeModel {
    fn get_audit_log_id(&self) -> Option<Uuid> {
        self.audit_log_id
    }

    fn get_hash(&self) -> i64 {
        self.hash
    }
}
