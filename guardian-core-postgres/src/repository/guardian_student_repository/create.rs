use guardian_core_api::Edge;
use guardian_core_db::repository::{RepositoryError, RepositoryResult};
use crate::utils::{database_error_code, map_sqlx_error, EDGE_PRIMARY_KEY};

use super::repo_impl::GuardianStudentRepositoryImpl;

impl GuardianStudentRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &GuardianStudentRepositoryImpl,
        edge: Edge,
    ) -> RepositoryResult<Edge> {
        let query = sqlx::query(
            r#"
            INSERT INTO guardian_student (
                guardian_id, student_id, is_primary, relationship_type,
                receives_sms, receives_email, receives_whatsapp, receives_portal, receives_calls,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(edge.guardian_id)
        .bind(edge.student_id)
        .bind(edge.is_primary)
        .bind(edge.relationship_type.as_str())
        .bind(edge.preferences.sms)
        .bind(edge.preferences.email)
        .bind(edge.preferences.whatsapp)
        .bind(edge.preferences.portal)
        .bind(edge.preferences.calls)
        .bind(edge.created_at)
        .bind(edge.updated_at);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or(RepositoryError::TransactionConsumed)?;
        if let Err(err) = query.execute(&mut **transaction).await {
            return Err(match database_error_code(&err) {
                Some((code, Some(constraint))) if code == "23505" && constraint == EDGE_PRIMARY_KEY => {
                    RepositoryError::DuplicateEdge {
                        guardian_id: edge.guardian_id,
                        student_id: edge.student_id,
                    }
                }
                _ => map_sqlx_error(err),
            });
        }
        tracing::debug!(guardian_id = %edge.guardian_id, student_id = %edge.student_id, "guardian_student inserted");

        Ok(edge)
    }
}
