use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{
    AuditAction, Edge, EdgePatch, PreferenceChannel, RelationshipError, RelationshipResult,
};
use guardian_core_db::repository::{EdgeRepository, EdgeSession};
use sqlx::Database;
use uuid::Uuid;

use crate::invariant_enforcer::mutation::{Applied, Mutation};

/// Flip one notification channel on one edge.
///
/// Preferences carry no cross-edge invariant, but the write still goes through
/// the student lock so it serializes with primary and sync changes.
pub struct TogglePreference {
    pub guardian_id: Uuid,
    pub student_id: Uuid,
    pub channel: PreferenceChannel,
    pub value: bool,
}

#[async_trait]
impl<DB: Database, S: EdgeSession<DB>> Mutation<DB, S> for TogglePreference {
    type Output = Edge;

    fn name(&self) -> &'static str {
        "toggle_preference"
    }

    fn student_id(&self) -> Uuid {
        self.student_id
    }

    async fn apply(&self, session: &S, now: DateTime<Utc>) -> RelationshipResult<Applied<Edge>> {
        let edge = session
            .edges()
            .find(self.guardian_id, self.student_id)
            .await?
            .ok_or_else(|| RelationshipError::not_linked(self.guardian_id, self.student_id))?;

        let edge = if edge.preferences.get(self.channel) == self.value {
            edge
        } else {
            let patch = EdgePatch::preferences(edge.preferences.with(self.channel, self.value));
            session
                .edges()
                .update(self.guardian_id, self.student_id, &patch, now)
                .await?
                .ok_or_else(|| RelationshipError::not_linked(self.guardian_id, self.student_id))?
        };
        tracing::debug!(
            guardian_id = %self.guardian_id,
            student_id = %self.student_id,
            channel = %self.channel,
            value = self.value,
            "preference set"
        );

        Ok(Applied::new(edge, AuditAction::PreferenceChanged, vec![self.guardian_id]).with_channel(self.channel))
    }
}

/// Edges of `edges` that opted into `channel`, primary guardian first.
pub fn recipients(edges: Vec<Edge>, channel: PreferenceChannel) -> Vec<Edge> {
    let mut recipients: Vec<Edge> = edges
        .into_iter()
        .filter(|edge| edge.preferences.get(channel))
        .collect();
    // Stable sort keeps the creation order among non-primary guardians.
    recipients.sort_by_key(|edge| !edge.is_primary);
    recipients
}
