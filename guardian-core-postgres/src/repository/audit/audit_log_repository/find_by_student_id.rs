use guardian_core_db::models::audit::AuditLogModel;
use uuid::Uuid;

use super::repo_impl::AuditLogRepositoryImpl;

impl AuditLogRepositoryImpl {
    pub(super) async fn find_by_student_id_impl(
        repo: &AuditLogRepositoryImpl,
        student_id: Uuid,
    ) -> Result<Vec<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query_as::<_, AuditLogModel>(
            r#"
            SELECT id, action, student_id, channel, updated_at, updated_by_user_id
            FROM audit_log
            WHERE student_id = $1
            ORDER BY updated_at, id
            "#,
        )
        .bind(student_id);

        let mut tx = repo.executor.tx.lock().await;
        if let Some(transaction) = tx.as_mut() {
            Ok(query.fetch_all(&mut **transaction).await?)
        } else {
            Err("Transaction has been consumed".into())
        }
    }
}
