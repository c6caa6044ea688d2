pub mod audit;
pub mod auditable;
pub mod fee;
pub mod identifiable;
pub mod identity;

// Re-exports
pub use audit::*;
pub use auditable::*;
pub use fee::*;
pub use identifiable::*;
pub use identity::*;
