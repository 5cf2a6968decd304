use guardian_core_db::models::audit::AuditLogModel;

use super::repo_impl::AuditLogRepositoryImpl;

impl AuditLogRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &AuditLogRepositoryImpl,
        audit_log: &AuditLogModel,
    ) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query(
            r#"
            INSERT INTO audit_log (id, action, student_id, channel, updated_at, updated_by_user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(audit_log.id)
        .bind(audit_log.action)
        .bind(audit_log.student_id)
        .bind(audit_log.channel.as_deref())
        .bind(audit_log.updated_at)
        .bind(audit_log.updated_by_user_id);

        let mut tx = repo.executor.tx.lock().await;
        if let Some(transaction) = tx.as_mut() {
            query.execute(&mut **transaction).await?;
        } else {
            return Err("Transaction has been consumed".into());
        }

        Ok(audit_log.clone())
    }
}
