use guardian_core_db::models::audit::AuditLinkModel;
use uuid::Uuid;

use super::repo_impl::AuditLinkRepositoryImpl;

impl AuditLinkRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &AuditLinkRepositoryImpl,
        audit_links: &[AuditLinkModel],
    ) -> Result<(), sqlx::Error> {
        if audit_links.is_empty() {
            return Ok(());
        }
        let (log_ids, guardian_ids): (Vec<Uuid>, Vec<Uuid>) = audit_links
            .iter()
            .map(|link| (link.audit_log_id, link.guardian_id))
            .unzip();

        let query = sqlx::query(
            r#"
            INSERT INTO audit_link (audit_log_id, guardian_id)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(log_ids)
        .bind(guardian_ids);

        let mut tx = repo.executor.tx.lock().await;
        if let Some(transaction) = tx.as_mut() {
            query.execute(&mut **transaction).await?;
        } else {
            return Err(sqlx::Error::Configuration("Transaction has been consumed".into()));
        }

        Ok(())
    }
}
