pub mod fee_ledger;
pub mod ledger_error;
pub mod payment_details;

pub use fee_ledger::*;
pub use ledger_error::*;
pub use payment_details::*;
