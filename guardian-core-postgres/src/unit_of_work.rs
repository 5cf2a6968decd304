use async_trait::async_trait;
use guardian_core_db::repository::{EdgeSession, RepositoryError, RepositoryResult, UnitOfWork};
use guardian_core_db::utils::student_lock_key;
use postgres_unit_of_work::Executor;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::guardian_repository::GuardianRepositoryImpl;
use crate::repository::guardian_student_repository::GuardianStudentRepositoryImpl;
use crate::repository::student_repository::StudentRepositoryImpl;
use crate::utils::map_sqlx_error;

/// Opens SERIALIZABLE transactions over the edge tables.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: Arc<PgPool>,
}

impl PostgresUnitOfWork {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork<Postgres> for PostgresUnitOfWork {
    type Session = PostgresSession;

    async fn begin(&self) -> RepositoryResult<PostgresSession> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(PostgresSession::new(Executor::new(tx)))
    }
}

/// Repositories sharing one transaction.
pub struct PostgresSession {
    executor: Executor,
    edges: GuardianStudentRepositoryImpl,
    guardians: GuardianRepositoryImpl,
    students: StudentRepositoryImpl,
}

impl PostgresSession {
    pub fn new(executor: Executor) -> Self {
        Self {
            edges: GuardianStudentRepositoryImpl::new(executor.clone()),
            guardians: GuardianRepositoryImpl::new(executor.clone()),
            students: StudentRepositoryImpl::new(executor.clone()),
            executor,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn guardian_repository(&self) -> &GuardianRepositoryImpl {
        &self.guardians
    }

    async fn finish(self, commit: bool) -> RepositoryResult<()> {
        let tx = self
            .executor
            .tx
            .lock()
            .await
            .take()
            .ok_or(RepositoryError::TransactionConsumed)?;
        if commit {
            tx.commit().await.map_err(map_sqlx_error)
        } else {
            tx.rollback().await.map_err(map_sqlx_error)
        }
    }
}

#[async_trait]
impl EdgeSession<Postgres> for PostgresSession {
    type Edges = GuardianStudentRepositoryImpl;
    type Guardians = GuardianRepositoryImpl;
    type Students = StudentRepositoryImpl;

    fn edges(&self) -> &GuardianStudentRepositoryImpl {
        &self.edges
    }

    fn guardians(&self) -> &GuardianRepositoryImpl {
        &self.guardians
    }

    fn students(&self) -> &StudentRepositoryImpl {
        &self.students
    }

    async fn lock_student(&self, student_id: Uuid) -> RepositoryResult<()> {
        let key = student_lock_key(student_id).map_err(|e| RepositoryError::Backend(e.into()))?;
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(key)
            .execute(&mut **transaction)
            .await
            .map_err(map_sqlx_error)?;
        tracing::trace!(%student_id, key, "student lock acquired");
        Ok(())
    }

    async fn commit(self) -> RepositoryResult<()> {
        self.finish(true).await
    }

    async fn rollback(self) -> RepositoryResult<()> {
        self.finish(false).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::guardian_student_repository::test_utils::test_utils::{
        create_test_guardian, create_test_student, new_test_edge,
    };
    use crate::test_helper::setup_shared_repos;
    use chrono::Utc;
    use guardian_core_api::EdgePatch;
    use guardian_core_db::repository::{EdgeRepository, EdgeSession, RepositoryError, UnitOfWork};
    use serial_test::serial;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_deferred_invariants_reject_commit() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let uow = repos.unit_of_work();

        let session = uow.begin().await?;
        let student_id = create_test_student(&session).await?;
        let guardian_id = create_test_guardian(&session).await?;
        session.edges().create(new_test_edge(guardian_id, student_id, false)).await?;

        // Zero primaries only surfaces when the deferred trigger runs.
        let err = session.commit().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_swap_inside_one_transaction_commits() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let uow = repos.unit_of_work();

        let session = uow.begin().await?;
        let student_id = create_test_student(&session).await?;
        let first = create_test_guardian(&session).await?;
        let second = create_test_guardian(&session).await?;
        session.lock_student(student_id).await?;
        session.edges().create(new_test_edge(first, student_id, true)).await?;
        session.edges().create(new_test_edge(second, student_id, false)).await?;
        session.edges().update(first, student_id, &EdgePatch::primary(false), Utc::now()).await?;
        session.edges().update(second, student_id, &EdgePatch::primary(true), Utc::now()).await?;
        session.commit().await?;

        let session = uow.begin().await?;
        let edges = session.edges().list_by_student(student_id).await?;
        let primaries: Vec<_> = edges.iter().filter(|e| e.is_primary).map(|e| e.guardian_id).collect();
        assert_eq!(primaries, vec![second]);

        // Cleanup: the student cascade removes both edges.
        {
            let mut tx = session.executor().tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query("DELETE FROM student WHERE id = $1")
                .bind(student_id)
                .execute(&mut **transaction)
                .await?;
            sqlx::query("DELETE FROM guardian WHERE id = ANY($1)")
                .bind(vec![first, second])
                .execute(&mut **transaction)
                .await?;
        }
        session.commit().await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_session_consumed_after_commit() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let session = repos.unit_of_work().begin().await?;
        let executor = session.executor().clone();
        session.rollback().await?;
        assert!(executor.tx.lock().await.is_none());
        Ok(())
    }
}
