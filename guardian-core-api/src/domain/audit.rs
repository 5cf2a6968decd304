use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::ActorContext;
use super::preference::PreferenceChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "audit_action", rename_all = "PascalCase"))]
pub enum AuditAction {
    Linked,
    Unlinked,
    PrimaryChanged,
    PreferenceChanged,
    GuardiansSynced,
}

impl From<AuditAction> for &str {
    fn from(val: AuditAction) -> Self {
        match val {
            AuditAction::Linked => "Linked",
            AuditAction::Unlinked => "Unlinked",
            AuditAction::PrimaryChanged => "PrimaryChanged",
            AuditAction::PreferenceChanged => "PreferenceChanged",
            AuditAction::GuardiansSynced => "GuardiansSynced",
        }
    }
}

/// # Documentation
/// - One event per committed mutation of a student's edge set
/// - `guardian_ids` lists every guardian whose edge was created, changed or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub actor: ActorContext,
    pub action: AuditAction,
    pub student_id: Uuid,
    pub guardian_ids: Vec<Uuid>,
    pub channel: Option<PreferenceChannel>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        actor: ActorContext,
        action: AuditAction,
        student_id: Uuid,
        guardian_ids: Vec<Uuid>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor,
            action,
            student_id,
            guardian_ids,
            channel: None,
            occurred_at,
        }
    }

    pub fn with_channel(mut self, channel: PreferenceChannel) -> Self {
        self.channel = Some(channel);
        self
    }
}
