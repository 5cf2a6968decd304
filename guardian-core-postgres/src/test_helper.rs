//! Transaction-scoped database fixtures.
//!
//! `setup_test_context` hands out a session that is never committed, so every
//! row a test writes through it disappears when the context is dropped.

use crate::config::PostgresConfig;
use crate::postgres_repositories::PostgresRepositories;
use crate::repository::audit::AuditRepositories;
use crate::unit_of_work::PostgresSession;
use guardian_core_db::repository::UnitOfWork;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

pub struct TestContext {
    pub session: PostgresSession,
    pub audit_repos: AuditRepositories,
}

impl TestContext {
    pub fn session(&self) -> &PostgresSession {
        &self.session
    }

    pub fn audit_repos(&self) -> &AuditRepositories {
        &self.audit_repos
    }
}

async fn connect(max_connections: u32) -> Result<PostgresRepositories, Box<dyn std::error::Error + Send + Sync>> {
    let config = PostgresConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(PostgresRepositories::new(Arc::new(pool)))
}

/// Session over a single-connection pool, rolled back on drop.
pub async fn setup_test_context() -> Result<TestContext, Box<dyn std::error::Error + Send + Sync>> {
    let repos = connect(1).await?;
    let session = repos.unit_of_work().begin().await?;
    let audit_repos = AuditRepositories::new(session.executor());
    Ok(TestContext { session, audit_repos })
}

/// Repositories over a shared pool for tests that commit and clean up after themselves.
pub async fn setup_shared_repos() -> Result<PostgresRepositories, Box<dyn std::error::Error + Send + Sync>> {
    connect(5).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::guardian_student_repository::test_utils::test_utils::create_test_student;
    use guardian_core_db::repository::{EdgeSession, ExistByIds};
    use serial_test::serial;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_transaction_rollback() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let student_id = {
            let ctx = setup_test_context().await?;
            let student_id = create_test_student(ctx.session()).await?;
            let exists = ctx.session().students().exist_by_ids(&[student_id]).await?;
            assert_eq!(exists, vec![(student_id, true)]);
            student_id
        };

        let ctx = setup_test_context().await?;
        let exists = ctx.session().students().exist_by_ids(&[student_id]).await?;
        assert_eq!(exists, vec![(student_id, false)]);
        Ok(())
    }
}
