use chrono::{DateTime, Utc};
use guardian_core_api::{AuditAction, AuditEvent};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One audit log row per committed edge-set mutation
/// - The guardians touched by the mutation are recorded as `audit_link` rows
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogModel {
    pub id: Uuid,
    pub action: AuditAction,
    pub student_id: Uuid,
    pub channel: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by_user_id: Uuid,
}

impl Identifiable for AuditLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<&AuditEvent> for AuditLogModel {
    fn from(event: &AuditEvent) -> Self {
        Self {
            id: event.id,
            action: event.action,
            student_id: event.student_id,
            channel: event.channel.map(|channel| channel.to_string()),
            updated_at: event.occurred_at,
            updated_by_user_id: event.actor.user_id,
        }
    }
}
