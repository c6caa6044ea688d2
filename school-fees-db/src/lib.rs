pub mod clock;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod service;
pub mod utils;

pub use clock::*;
pub use ledger::*;
pub use models::*;
pub use repository::*;
pub use service::*;

#[cfg(test)]
pub(crate) mod test_utils;
