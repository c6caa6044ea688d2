use rust_decimal::Decimal;
use school_fees_api::ApiError;
use thiserror::Error;
use uuid::Uuid;

/// Rejections of a ledger operation. The fee is left untouched whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Payment amount must be greater than 0, got {0}")]
    InvalidAmount(Decimal),

    #[error("Payment of {payment_amount} exceeds the outstanding balance (paid {paid_amount} of {amount})")]
    Overpayment {
        amount: Decimal,
        paid_amount: Decimal,
        payment_amount: Decimal,
    },

    #[error("Fee is already fully paid")]
    AlreadyPaid,

    #[error("Transaction {0} was already applied")]
    DuplicateTransaction(String),
}

impl LedgerError {
    /// Attaches the fee id the operation ran against.
    pub fn for_fee(self, fee_id: Uuid) -> ApiError {
        match self {
            LedgerError::InvalidAmount(_) => {
                ApiError::ValidationError("Payment amount must be greater than 0".to_string())
            }
            LedgerError::Overpayment {
                amount,
                paid_amount,
                payment_amount,
            } => ApiError::Overpayment {
                fee_id,
                amount,
                paid_amount,
                payment_amount,
            },
            LedgerError::AlreadyPaid => ApiError::AlreadyPaid(fee_id),
            LedgerError::DuplicateTransaction(transaction_id) => ApiError::DuplicateTransaction {
                fee_id,
                transaction_id,
            },
        }
    }
}
