use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::map_sqlx_error;
use uuid::Uuid;

use super::repo_impl::GuardianStudentRepositoryImpl;

impl GuardianStudentRepositoryImpl {
    pub(super) async fn delete_impl(
        repo: &GuardianStudentRepositoryImpl,
        guardian_id: Uuid,
        student_id: Uuid,
    ) -> RepositoryResult<bool> {
        let query = sqlx::query(
            r#"
            DELETE FROM guardian_student WHERE guardian_id = $1 AND student_id = $2
            "#,
        )
        .bind(guardian_id)
        .bind(student_id);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        let result = query.execute(&mut **transaction).await.map_err(map_sqlx_error)?;
        tracing::debug!(%guardian_id, %student_id, rows = result.rows_affected(), "guardian_student deleted");

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use guardian_core_db::repository::{EdgeRepository, EdgeSession};
    use serial_test::serial;
    use super::super::test_utils::test_utils::{create_test_guardian, create_test_student, new_test_edge};

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_delete_edge() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();
        let guardian_id = create_test_guardian(session).await?;
        let student_id = create_test_student(session).await?;
        session.edges().create(new_test_edge(guardian_id, student_id, true)).await?;

        assert!(session.edges().delete(guardian_id, student_id).await?);
        assert!(!session.edges().delete(guardian_id, student_id).await?);
        assert!(session.edges().find(guardian_id, student_id).await?.is_none());
        Ok(())
    }
}
