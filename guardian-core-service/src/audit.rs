use async_trait::async_trait;
use guardian_core_api::{AuditEvent, AuditSink};

/// Sink that writes each event to the `guardian_core::audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let action: &str = event.action.into();
        tracing::info!(
            target: "guardian_core::audit",
            audit_id = %event.id,
            actor = %event.actor.user_id,
            action,
            student_id = %event.student_id,
            guardian_ids = ?event.guardian_ids,
            channel = ?event.channel,
            occurred_at = %event.occurred_at,
            "edge set mutated"
        );
        Ok(())
    }
}
