use async_trait::async_trait;

use crate::domain::AuditEvent;

/// Receiver of one event per committed mutation. Storage and format belong to the implementor.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
