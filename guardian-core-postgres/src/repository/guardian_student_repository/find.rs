use guardian_core_api::Edge;
use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::{map_sqlx_error, TryFromRow};
use uuid::Uuid;

use super::repo_impl::{GuardianStudentRepositoryImpl, EDGE_COLUMNS};

impl GuardianStudentRepositoryImpl {
    pub(super) async fn find_impl(
        repo: &GuardianStudentRepositoryImpl,
        guardian_id: Uuid,
        student_id: Uuid,
    ) -> RepositoryResult<Option<Edge>> {
        let query = format!(
            "SELECT {EDGE_COLUMNS} FROM guardian_student WHERE guardian_id = $1 AND student_id = $2"
        );
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(&query)
                .bind(guardian_id)
                .bind(student_id)
                .fetch_optional(&mut **transaction)
                .await
                .map_err(map_sqlx_error)?
        };

        match row {
            Some(row) => Ok(Some(Edge::try_from_row(&row)?)),
            None => Ok(None),
        }
    }
}
