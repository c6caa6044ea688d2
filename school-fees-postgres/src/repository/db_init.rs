//! Schema setup and teardown from the SQL files shipped with the crate.

use sqlx::PgPool;
use std::fs;
use std::path::Path;
use tracing::info;

/// Executes the files of `migrations/` in ascending file name order.
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Executes the files of `cleanup/` in descending file name order.
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(sqlx::Error::Io)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    entries.sort_by(|a, b| {
        let ordering = a.file_name().cmp(&b.file_name());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    for entry in entries {
        let path = entry.path();
        let sql = fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        info!(file = %path.display(), "executing sql file");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostgresConfig;
    use serial_test::serial;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_init_and_cleanup() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pool = PostgresConfig::from_env()?.connect().await?;

        cleanup_database(&pool).await?;
        init_database(&pool).await?;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_name IN ('fee', 'fee_payment', 'fee_audit', 'audit_log', 'audit_link')",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(tables, 5);

        cleanup_database(&pool).await?;
        Ok(())
    }
}
