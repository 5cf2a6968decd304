use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// # Documentation
/// - Links one audit log to every guardian whose edge the mutation touched
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLinkModel {
    pub audit_log_id: Uuid,
    pub guardian_id: Uuid,
}
