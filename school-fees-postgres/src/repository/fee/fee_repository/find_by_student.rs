use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::RepositoryError;
use uuid::Uuid;

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

impl FeeRepositoryImpl {
    pub(super) async fn find_by_student_impl(
        repo: &FeeRepositoryImpl,
        student_id: Uuid,
    ) -> Result<Vec<FeeModel>, RepositoryError> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM fee
            WHERE student_id = $1
            ORDER BY due_date ASC, created_at ASC, id ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&mut **transaction)
        .await?;

        Self::hydrate(&mut **transaction, rows).await
    }
}
