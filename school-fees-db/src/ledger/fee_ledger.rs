use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, NewFee};
use uuid::Uuid;

use super::ledger_error::LedgerError;
use super::payment_details::PaymentDetails;
use crate::models::fee::{FeeModel, PaymentRecordModel};

/// State transitions of a single fee obligation.
///
/// Every operation is a pure function of its arguments: no I/O, no clock
/// reads, no permission checks. Callers persist the result and call
/// [`FeeLedger::normalize`] before every save.
///
/// Ledger-owned mutations keep these properties:
/// - `0 <= paid_amount <= amount`
/// - `paid_amount` equals the sum of `payment_history`
/// - every history entry is strictly positive and entries are only appended
pub struct FeeLedger;

impl FeeLedger {
    /// Builds a new obligation with an empty ledger.
    ///
    /// The status is already normalized against `now`, so a due date in the
    /// past yields `Overdue` and a zero amount yields `Paid`.
    pub fn create(new_fee: NewFee, created_by: Uuid, now: DateTime<Utc>) -> FeeModel {
        let mut fee = FeeModel {
            id: Uuid::new_v4(),
            student_id: new_fee.student_id,
            fee_type: new_fee.fee_type,
            amount: new_fee.amount,
            paid_amount: Decimal::ZERO,
            due_date: new_fee.due_date,
            status: FeeStatus::Pending,
            payment_method: None,
            transaction_id: None,
            payment_date: None,
            academic_year: new_fee.academic_year,
            semester: new_fee.semester,
            description: new_fee.description,
            created_by,
            payment_history: Vec::new(),
            created_at: now,
            updated_at: now,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };
        Self::normalize(&mut fee, now.date_naive());
        fee
    }

    /// Records a payment of `payment_amount` against the fee.
    ///
    /// Fails without touching the fee if the amount is not positive or would
    /// push `paid_amount` above `amount`. Transaction ids are not checked here;
    /// see [`FeeLedger::ensure_new_transaction`].
    pub fn apply_payment(
        fee: &mut FeeModel,
        payment_amount: Decimal,
        details: PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if payment_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(payment_amount));
        }
        // A sum beyond the decimal range is necessarily above `amount`
        let new_paid_amount = fee
            .paid_amount
            .checked_add(payment_amount)
            .filter(|total| *total <= fee.amount)
            .ok_or(LedgerError::Overpayment {
                amount: fee.amount,
                paid_amount: fee.paid_amount,
                payment_amount,
            })?;

        fee.paid_amount = new_paid_amount;
        fee.payment_method = Some(details.method);
        if details.transaction_id.is_some() {
            fee.transaction_id = details.transaction_id.clone();
        }
        Self::append(fee, payment_amount, details, now);

        if fee.paid_amount >= fee.amount {
            fee.status = FeeStatus::Paid;
            fee.payment_date = Some(now);
        } else {
            fee.status = FeeStatus::Partial;
        }
        Ok(())
    }

    /// Settles the whole outstanding balance in one ledger entry.
    ///
    /// The entry records the remainder, not the full amount, so the history
    /// keeps summing to `paid_amount` after a prior partial payment. Returns
    /// the amount recorded.
    pub fn mark_fully_paid(
        fee: &mut FeeModel,
        details: PaymentDetails,
        now: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        let remainder = Self::remaining_balance(fee);
        if remainder <= Decimal::ZERO {
            return Err(LedgerError::AlreadyPaid);
        }

        fee.paid_amount = fee.amount;
        fee.status = FeeStatus::Paid;
        fee.payment_date = Some(now);
        fee.payment_method = Some(details.method);
        fee.transaction_id = details.transaction_id.clone();
        Self::append(fee, remainder, details, now);
        Ok(remainder)
    }

    /// Stamps `Overdue` on an unpaid fee whose due date lies before `today`.
    ///
    /// Depends only on `(due_date, status, today)`. It never clears `Overdue`;
    /// [`FeeLedger::normalize`] does that by re-deriving the status first.
    pub fn recompute_overdue_status(fee: &mut FeeModel, today: NaiveDate) {
        if fee.due_date < today && fee.status != FeeStatus::Paid {
            fee.status = FeeStatus::Overdue;
        }
    }

    /// Status implied by the amounts alone, ignoring the due date
    pub fn derive_status(paid_amount: Decimal, amount: Decimal) -> FeeStatus {
        if paid_amount >= amount {
            FeeStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            FeeStatus::Partial
        } else {
            FeeStatus::Pending
        }
    }

    /// Must run on every save, whatever changed.
    ///
    /// Re-derives the status from the amounts and then applies the overdue
    /// rule, so editing a due date forward lifts an `Overdue` stamp.
    pub fn normalize(fee: &mut FeeModel, today: NaiveDate) {
        fee.status = Self::derive_status(fee.paid_amount, fee.amount);
        Self::recompute_overdue_status(fee, today);
    }

    /// `max(0, amount - paid_amount)`
    pub fn remaining_balance(fee: &FeeModel) -> Decimal {
        (fee.amount - fee.paid_amount).max(Decimal::ZERO)
    }

    /// Predicate behind overdue listings: past due and not paid.
    ///
    /// A fee already stamped `Overdue` still matches; its underlying state is
    /// pending or partial.
    pub fn is_overdue_candidate(fee: &FeeModel, today: NaiveDate) -> bool {
        fee.due_date < today && fee.status != FeeStatus::Paid
    }

    /// Rejects a payment whose transaction id is already in the fee's history.
    pub fn ensure_new_transaction(
        fee: &FeeModel,
        details: &PaymentDetails,
    ) -> Result<(), LedgerError> {
        match details.transaction_id.as_deref() {
            Some(transaction_id) if fee.has_transaction(transaction_id) => {
                Err(LedgerError::DuplicateTransaction(transaction_id.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn append(fee: &mut FeeModel, amount: Decimal, details: PaymentDetails, now: DateTime<Utc>) {
        let sequence = fee.payment_history.len() as i32;
        fee.payment_history.push(PaymentRecordModel {
            sequence,
            amount,
            payment_date: now,
            payment_method: details.method,
            transaction_id: details.transaction_id,
            receipt_number: details.receipt_number,
            notes: details.notes,
        });
    }
}
