//! Transaction-scoped fixtures for the database tests.
//!
//! Every context runs inside a session that is never committed, so whatever
//! a test writes is rolled back when the context is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use school_fees_db::models::audit::AuditLogModel;
use school_fees_db::models::identity::UserRef;
use school_fees_db::repository::{IdentityDirectory, RepositoryError};
use school_fees_db::{Clock, SystemClock};
use uuid::Uuid;

use crate::config::PostgresConfig;
use crate::postgres_repositories::{FeeSession, PostgresRepositories};

pub struct TestContext {
    pub session: FeeSession,
}

/// Connects with the `DATABASE_*` settings, applies the migrations and opens a session.
pub async fn setup_test_context() -> Result<TestContext, Box<dyn std::error::Error + Send + Sync>> {
    let repos = setup_shared_repos().await?;
    let session = repos.begin().await?;
    Ok(TestContext { session })
}

/// Repositories for tests that need more than one session, e.g. to observe a commit
pub async fn setup_shared_repos() -> Result<PostgresRepositories, Box<dyn std::error::Error + Send + Sync>> {
    let pool = PostgresConfig::from_env()?.connect().await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(PostgresRepositories::new(Arc::new(pool)))
}

pub fn create_test_audit_log() -> AuditLogModel {
    AuditLogModel::new(Uuid::new_v4(), SystemClock.now())
}

/// Fixed set of users standing in for the identity service
pub struct StaticIdentityDirectory {
    users: HashMap<Uuid, UserRef>,
}

impl StaticIdentityDirectory {
    pub fn new(users: Vec<UserRef>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait]
impl IdentityDirectory for StaticIdentityDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRef>, RepositoryError> {
        Ok(self.users.get(&id).cloned())
    }
}
