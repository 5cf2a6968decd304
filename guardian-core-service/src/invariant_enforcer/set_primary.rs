use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{
    AuditAction, Edge, EdgePatch, InvariantKind, RelationshipError, RelationshipResult,
};
use guardian_core_db::repository::{EdgeRepository, EdgeSession};
use sqlx::Database;
use uuid::Uuid;

use super::checks::demote_primaries;
use super::mutation::{Applied, Mutation};

pub struct SetPrimary {
    pub guardian_id: Uuid,
    pub student_id: Uuid,
    pub value: bool,
}

#[async_trait]
impl<DB: Database, S: EdgeSession<DB>> Mutation<DB, S> for SetPrimary {
    type Output = Edge;

    fn name(&self) -> &'static str {
        "set_primary"
    }

    fn student_id(&self) -> Uuid {
        self.student_id
    }

    async fn apply(&self, session: &S, now: DateTime<Utc>) -> RelationshipResult<Applied<Edge>> {
        let edges = session.edges().list_by_student(self.student_id).await?;
        let target = edges
            .iter()
            .find(|edge| edge.guardian_id == self.guardian_id)
            .cloned()
            .ok_or_else(|| RelationshipError::not_linked(self.guardian_id, self.student_id))?;

        if !self.value {
            if target.is_primary {
                return Err(RelationshipError::InvariantViolation(
                    InvariantKind::CannotDemotePrimary,
                ));
            }
            return Ok(Applied::new(target, AuditAction::PrimaryChanged, vec![self.guardian_id]));
        }

        // Demote first, then promote: the pair runs in one transaction under the student lock.
        let mut touched = demote_primaries::<DB, S>(session, &edges, Some(self.guardian_id), now).await?;
        let promoted = if target.is_primary {
            target
        } else {
            session
                .edges()
                .update(self.guardian_id, self.student_id, &EdgePatch::primary(true), now)
                .await?
                .ok_or_else(|| RelationshipError::not_linked(self.guardian_id, self.student_id))?
        };
        tracing::debug!(guardian_id = %self.guardian_id, student_id = %self.student_id, demoted = ?touched, "primary guardian set");

        touched.insert(0, self.guardian_id);
        Ok(Applied::new(promoted, AuditAction::PrimaryChanged, touched))
    }
}
