use async_trait::async_trait;
use guardian_core_api::{AuditEvent, AuditSink};
use guardian_core_db::models::audit::{AuditLinkModel, AuditLogModel};
use postgres_unit_of_work::Executor;
use sqlx::PgPool;
use std::sync::Arc;

use super::AuditRepositories;

/// Persists audit events as one `audit_log` row plus one `audit_link` row per guardian.
///
/// Events are written in their own transaction after the edge change committed.
pub struct PostgresAuditSink {
    pool: Arc<PgPool>,
}

impl PostgresAuditSink {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let executor = Executor::new(self.pool.begin().await?);
        let repos = AuditRepositories::new(&executor);

        let audit_log = repos.audit_log_repository.create(&AuditLogModel::from(&event)).await?;
        let links: Vec<AuditLinkModel> = event
            .guardian_ids
            .iter()
            .map(|guardian_id| AuditLinkModel {
                audit_log_id: audit_log.id,
                guardian_id: *guardian_id,
            })
            .collect();
        repos.audit_link_repository.create(&links).await?;

        let tx = executor.tx.lock().await.take().ok_or("Transaction has been consumed")?;
        tx.commit().await?;
        tracing::debug!(audit_log_id = %audit_log.id, links = links.len(), "audit event stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::setup_shared_repos;
    use chrono::Utc;
    use guardian_core_api::{ActorContext, AuditAction, PreferenceChannel};
    use serial_test::serial;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore]
    #[serial]
    async fn test_record_persists_log_and_links() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let repos = setup_shared_repos().await?;
        let sink = repos.audit_sink();
        let student_id = Uuid::new_v4();
        let guardian_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let event = AuditEvent::new(
            ActorContext::new(Uuid::new_v4()),
            AuditAction::PreferenceChanged,
            student_id,
            guardian_ids.clone(),
            Utc::now(),
        )
        .with_channel(PreferenceChannel::Email);

        sink.record(event.clone()).await?;

        let executor = Executor::new(repos.pool().begin().await?);
        let audit_repos = AuditRepositories::new(&executor);
        let logs = audit_repos.audit_log_repository.find_by_student_id(student_id).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, event.id);
        assert_eq!(logs[0].channel.as_deref(), Some("email"));
        let links = audit_repos.audit_link_repository.find_by_audit_log_id(event.id).await?;
        assert_eq!(links.len(), guardian_ids.len());

        {
            let mut tx = executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query("DELETE FROM audit_log WHERE id = $1")
                .bind(event.id)
                .execute(&mut **transaction)
                .await?;
        }
        let tx = executor.tx.lock().await.take().ok_or("Transaction has been consumed")?;
        tx.commit().await?;
        Ok(())
    }
}
