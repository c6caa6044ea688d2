use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use school_fees_api::PaymentMethod;
use serde::{Deserialize, Serialize};

/// One entry of a fee's payment ledger.
///
/// Entries are append-only: `sequence` is the 0-based position at which the
/// entry was appended and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecordModel {
    pub sequence: i32,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<HeaplessString<400>>,
    pub receipt_number: Option<HeaplessString<200>>,
    pub notes: Option<HeaplessString<2000>>,
}
