use std::sync::Arc;

use school_fees_db::repository::RepositoryError;
use sqlx::PgPool;
use tracing::debug;

use crate::config::PostgresConfig;
use crate::executor::Executor;
use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;
use crate::repository::fee::fee_repository::FeeRepositoryImpl;

/// Entry point of the Postgres backend. Hands out sessions, each bound to one transaction.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn from_config(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        Ok(Self::new(Arc::new(config.connect().await?)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Opens a transaction and builds the repositories sharing it
    pub async fn begin(&self) -> Result<FeeSession, sqlx::Error> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);
        debug!("fee session opened");
        Ok(FeeSession {
            fee_repository: Arc::new(FeeRepositoryImpl::new(executor.clone())),
            audit_log_repository: Arc::new(AuditLogRepositoryImpl::new(executor.clone())),
            executor,
        })
    }
}

/// Unit of work over the fee tables.
///
/// Nothing written through the session's repositories is visible to others
/// until [`FeeSession::commit`]. Dropping the session without committing
/// rolls the transaction back.
pub struct FeeSession {
    executor: Executor,
    pub fee_repository: Arc<FeeRepositoryImpl>,
    pub audit_log_repository: Arc<AuditLogRepositoryImpl>,
}

impl FeeSession {
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.executor.commit().await?;
        debug!("fee session committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), RepositoryError> {
        self.executor.rollback().await?;
        debug!("fee session rolled back");
        Ok(())
    }
}
