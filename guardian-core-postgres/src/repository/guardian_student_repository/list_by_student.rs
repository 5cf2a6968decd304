use guardian_core_api::Edge;
use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::{map_sqlx_error, TryFromRow};
use uuid::Uuid;

use super::repo_impl::{GuardianStudentRepositoryImpl, EDGE_COLUMNS};

impl GuardianStudentRepositoryImpl {
    pub(super) async fn list_by_student_impl(
        repo: &GuardianStudentRepositoryImpl,
        student_id: Uuid,
    ) -> RepositoryResult<Vec<Edge>> {
        let query = format!(
            "SELECT {EDGE_COLUMNS} FROM guardian_student WHERE student_id = $1 ORDER BY created_at, guardian_id"
        );
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(&query)
                .bind(student_id)
                .fetch_all(&mut **transaction)
                .await
                .map_err(map_sqlx_error)?
        };

        let mut edges = Vec::with_capacity(rows.len());
        for row in rows {
            edges.push(Edge::try_from_row(&row)?);
        }
        Ok(edges)
    }
}
