pub mod caller;
pub mod fee_enums;
pub mod requests;

pub use caller::*;
pub use fee_enums::*;
pub use requests::*;
