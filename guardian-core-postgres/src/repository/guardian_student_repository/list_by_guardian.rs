use guardian_core_api::Edge;
use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::{map_sqlx_error, TryFromRow};
use uuid::Uuid;

use super::repo_impl::{GuardianStudentRepositoryImpl, EDGE_COLUMNS};

impl GuardianStudentRepositoryImpl {
    pub(super) async fn list_by_guardian_impl(
        repo: &GuardianStudentRepositoryImpl,
        guardian_id: Uuid,
    ) -> RepositoryResult<Vec<Edge>> {
        let query = format!(
            "SELECT {EDGE_COLUMNS} FROM guardian_student WHERE guardian_id = $1 ORDER BY created_at, student_id"
        );
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
            sqlx::query(&query)
                .bind(guardian_id)
                .fetch_all(&mut **transaction)
                .await
                .map_err(map_sqlx_error)?
        };

        rows.iter()
            .map(|row| Edge::try_from_row(row).map_err(RepositoryError::from))
            .collect()
    }
}
