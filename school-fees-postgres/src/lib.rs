pub mod config;
pub mod executor;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use config::{ConfigError, PostgresConfig};
pub use executor::Executor;
pub use postgres_repositories::{FeeSession, PostgresRepositories};
pub use repository::audit::audit_log_repository::AuditLogRepositoryImpl;
pub use repository::fee::fee_repository::FeeRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
