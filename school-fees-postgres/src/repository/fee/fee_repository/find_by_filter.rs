use school_fees_db::models::fee::FeeModel;
use school_fees_db::repository::{FeeFilter, Page, PageRequest, RepositoryError};

use super::repo_impl::FeeRepositoryImpl;
use crate::executor::consumed;

// Every predicate is skipped when its parameter is NULL.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::uuid[] IS NULL OR student_id = ANY($1))
      AND ($2::fee_status IS NULL OR status = $2)
      AND ($3::fee_type IS NULL OR fee_type = $3)
      AND ($4::varchar IS NULL OR academic_year = $4)
      AND ($5::semester IS NULL OR semester = $5)
"#;

impl FeeRepositoryImpl {
    pub(super) async fn find_by_filter_impl(
        repo: &FeeRepositoryImpl,
        filter: &FeeFilter,
        page: PageRequest,
    ) -> Result<Page<FeeModel>, RepositoryError> {
        let count_sql = format!("SELECT COUNT(*) FROM fee {FILTER_CLAUSE}");
        let select_sql = format!(
            "SELECT * FROM fee {FILTER_CLAUSE} ORDER BY due_date ASC, created_at ASC, id ASC LIMIT $6 OFFSET $7"
        );
        let academic_year = filter.academic_year.as_ref().map(|y| y.as_str());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;

        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.student_ids.as_deref())
            .bind(filter.status)
            .bind(filter.fee_type)
            .bind(academic_year)
            .bind(filter.semester)
            .fetch_one(&mut **transaction)
            .await?;

        let rows = sqlx::query(&select_sql)
            .bind(filter.student_ids.as_deref())
            .bind(filter.status)
            .bind(filter.fee_type)
            .bind(academic_year)
            .bind(filter.semester)
            .bind(page.limit as i64)
            .bind(page.offset as i64)
            .fetch_all(&mut **transaction)
            .await?;
        let items = Self::hydrate(&mut **transaction, rows).await?;

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}
