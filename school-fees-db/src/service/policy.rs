/// Behavioural switches of [`crate::service::FeeService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    /// Reject a payment whose transaction id already appears in the fee's history
    pub dedupe_transaction_ids: bool,
    /// Re-read and retry a payment once when the optimistic guard fails
    pub retry_on_conflict: bool,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            dedupe_transaction_ids: true,
            retry_on_conflict: true,
        }
    }
}

impl FeePolicy {
    /// Accepts repeated transaction ids and never retries
    pub fn permissive() -> Self {
        Self {
            dedupe_transaction_ids: false,
            retry_on_conflict: false,
        }
    }
}
