pub mod audit_log_repository;
pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod fee_repository;
pub mod identity_directory;
pub mod load;
pub mod load_batch;
pub mod pagination;
pub mod repository_error;
pub mod update_batch;

// Re-exports
pub use audit_log_repository::*;
pub use create_batch::*;
pub use delete_batch::*;
pub use exist_by_ids::*;
pub use fee_repository::*;
pub use identity_directory::*;
pub use load::*;
pub use load_batch::*;
pub use pagination::*;
pub use repository_error::*;
pub use update_batch::*;
