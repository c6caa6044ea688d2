use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(
        "Payment of {payment_amount} exceeds the outstanding balance of fee {fee_id} \
         (paid {paid_amount} of {amount})"
    )]
    Overpayment {
        fee_id: Uuid,
        amount: Decimal,
        paid_amount: Decimal,
        payment_amount: Decimal,
    },

    #[error("Fee {0} is already fully paid")]
    AlreadyPaid(Uuid),

    #[error("Transaction {transaction_id} was already applied to fee {fee_id}")]
    DuplicateTransaction { fee_id: Uuid, transaction_id: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Concurrent modification of {0}, reload and retry")]
    ConcurrencyConflict(Uuid),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    /// HTTP status the boundary layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError(_) | ApiError::Overpayment { .. } => 400,
            ApiError::Unauthorized(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::AlreadyPaid(_)
            | ApiError::DuplicateTransaction { .. }
            | ApiError::ConcurrencyConflict(_) => 409,
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => 500,
        }
    }

    /// Only a failed optimistic guard may be retried, and only after re-reading the record.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ConcurrencyConflict(_))
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
