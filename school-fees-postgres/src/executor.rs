use std::sync::Arc;

use school_fees_db::repository::RepositoryError;
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

/// Handle on one open transaction, shared by every repository of a session.
///
/// The transaction is taken out on commit or rollback; any later use fails
/// with "Transaction has been consumed".
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), RepositoryError> {
        let tx = self.tx.lock().await.take().ok_or_else(consumed)?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), RepositoryError> {
        let tx = self.tx.lock().await.take().ok_or_else(consumed)?;
        tx.rollback().await?;
        Ok(())
    }
}

pub(crate) fn consumed() -> RepositoryError {
    RepositoryError::Other("Transaction has been consumed".to_string())
}
