//! Orchestration of the fee ledger with storage, identity and notifications.

pub mod access;
pub mod events;
pub mod fee_service;
pub mod policy;

pub use access::AccessPolicy;
pub use events::{EventResult, FeeEventSink, NoopEventSink};
pub use fee_service::FeeService;
pub use policy::FeePolicy;
