use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use school_fees_api::{FeeStatus, FeeType, PaymentMethod};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fee::FeeModel;
use crate::ledger::FeeLedger;

/// Receipt data for a fee; rendering is left to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReceipt {
    pub fee: FeeModel,
    pub receipt_number: String,
    pub generated_at: DateTime<Utc>,
}

impl FeeReceipt {
    /// The receipt number of the latest ledger entry, else `FEE-<fee id>`.
    pub fn for_fee(fee: FeeModel, generated_at: DateTime<Utc>) -> Self {
        let receipt_number = fee
            .latest_payment()
            .and_then(|p| p.receipt_number.as_ref())
            .map(|r| r.as_str().to_string())
            .unwrap_or_else(|| format!("FEE-{}", fee.id));
        Self {
            fee,
            receipt_number,
            generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeeSummary {
    pub student_id: Uuid,
    pub count: usize,
    /// Outstanding balance over all fees that are not paid
    pub total_due: Decimal,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub fees: Vec<FeeModel>,
}

impl StudentFeeSummary {
    /// `None` when the outstanding balance leaves the `Decimal` range
    pub fn from_fees(student_id: Uuid, fees: Vec<FeeModel>) -> Option<Self> {
        let total_due = fees
            .iter()
            .filter(|f| f.status != FeeStatus::Paid)
            .map(FeeLedger::remaining_balance)
            .try_fold(Decimal::ZERO, |total, balance| total.checked_add(balance))?;
        let count_with = |status: FeeStatus| fees.iter().filter(|f| f.status == status).count();

        Some(Self {
            student_id,
            count: fees.len(),
            total_due,
            pending_count: count_with(FeeStatus::Pending),
            overdue_count: count_with(FeeStatus::Overdue),
            fees,
        })
    }
}

/// A ledger entry flattened together with the fee it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPaymentEntry {
    pub fee_id: Uuid,
    pub fee_type: FeeType,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<HeaplessString<400>>,
    pub receipt_number: Option<HeaplessString<200>>,
    pub notes: Option<HeaplessString<2000>>,
}

impl StudentPaymentEntry {
    /// Every ledger entry of the given fees, newest payment first.
    pub fn collect(fees: &[FeeModel]) -> Vec<Self> {
        let mut entries: Vec<Self> = fees
            .iter()
            .flat_map(|fee| {
                fee.payment_history.iter().map(move |p| StudentPaymentEntry {
                    fee_id: fee.id,
                    fee_type: fee.fee_type,
                    amount: p.amount,
                    payment_date: p.payment_date,
                    payment_method: p.payment_method,
                    transaction_id: p.transaction_id.clone(),
                    receipt_number: p.receipt_number.clone(),
                    notes: p.notes.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        entries
    }
}
