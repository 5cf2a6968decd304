use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{AuditAction, InvariantKind, RelationshipError, RelationshipResult};
use guardian_core_db::repository::{EdgeRepository, EdgeSession};
use sqlx::Database;
use uuid::Uuid;

use super::mutation::{Applied, Mutation};

pub struct Unlink {
    pub guardian_id: Uuid,
    pub student_id: Uuid,
}

#[async_trait]
impl<DB: Database, S: EdgeSession<DB>> Mutation<DB, S> for Unlink {
    type Output = ();

    fn name(&self) -> &'static str {
        "unlink"
    }

    fn student_id(&self) -> Uuid {
        self.student_id
    }

    async fn apply(&self, session: &S, _now: DateTime<Utc>) -> RelationshipResult<Applied<()>> {
        let edges = session.edges().list_by_student(self.student_id).await?;
        let target = edges
            .iter()
            .find(|edge| edge.guardian_id == self.guardian_id)
            .ok_or_else(|| RelationshipError::not_linked(self.guardian_id, self.student_id))?;

        if edges.len() <= 1 {
            return Err(RelationshipError::InvariantViolation(
                InvariantKind::MinOneGuardianRequired,
            ));
        }
        if target.is_primary {
            return Err(RelationshipError::InvariantViolation(
                InvariantKind::CannotUnlinkPrimary,
            ));
        }

        if !session.edges().delete(self.guardian_id, self.student_id).await? {
            return Err(RelationshipError::not_linked(self.guardian_id, self.student_id));
        }
        tracing::debug!(guardian_id = %self.guardian_id, student_id = %self.student_id, "edge deleted");

        Ok(Applied::new((), AuditAction::Unlinked, vec![self.guardian_id]))
    }
}
