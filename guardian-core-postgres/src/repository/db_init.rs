//! Schema setup and teardown from the bundled SQL files.
//!
//! `migrations/` is applied in ascending file order and `cleanup/` in
//! descending order, so each cleanup file undoes its migration counterpart.

use sqlx::PgPool;
use std::fs;
use std::path::Path;

/// Execute every migration file in ascending order.
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use guardian_core_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Execute every cleanup file in descending order, dropping the schema.
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
        tracing::debug!(file = %path.display(), "executing sql file");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
#[serial_test::serial]
mod tests {
    use super::*;
    use crate::config::PostgresConfig;

    #[tokio::test]
    #[ignore]
    async fn test_cleanup_and_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pool = PostgresConfig::from_env()?.connect().await?;

        // Leaves the schema in place for the other database tests.
        cleanup_database(&pool).await?;
        init_database(&pool).await?;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'guardian_student'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(tables, 1);
        Ok(())
    }
}
