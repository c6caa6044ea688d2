pub mod fee;
pub mod payment_record;
pub mod reports;
pub mod statistics;

pub use fee::*;
pub use payment_record::*;
pub use reports::*;
pub use statistics::*;
