use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{
    AuditAction, Edge, InvariantKind, LinkRequest, RelationshipError, RelationshipResult,
    RelationshipType,
};
use guardian_core_db::repository::{EdgeRepository, EdgeSession};
use sqlx::Database;
use uuid::Uuid;

use super::checks::{demote_primaries, ensure_guardians_exist, ensure_student_exists};
use super::mutation::{Applied, Mutation};

pub struct Link {
    pub request: LinkRequest,
    pub relationship_type: RelationshipType,
}

#[async_trait]
impl<DB: Database, S: EdgeSession<DB>> Mutation<DB, S> for Link {
    type Output = Edge;

    fn name(&self) -> &'static str {
        "link"
    }

    fn student_id(&self) -> Uuid {
        self.request.student_id
    }

    async fn apply(&self, session: &S, now: DateTime<Utc>) -> RelationshipResult<Applied<Edge>> {
        let guardian_id = self.request.guardian_id;
        let student_id = self.request.student_id;

        ensure_guardians_exist::<DB, S>(session, &[guardian_id]).await?;
        ensure_student_exists::<DB, S>(session, student_id).await?;

        if session.edges().find(guardian_id, student_id).await?.is_some() {
            return Err(RelationshipError::InvariantViolation(InvariantKind::DuplicateEdge));
        }

        let existing = session.edges().list_by_student(student_id).await?;
        // A student's first guardian is primary whatever the caller asked for.
        let is_primary = existing.is_empty() || self.request.is_primary;

        let mut touched = Vec::new();
        if is_primary {
            touched = demote_primaries::<DB, S>(session, &existing, None, now).await?;
        }

        let edge = Edge::new(
            guardian_id,
            student_id,
            self.relationship_type.clone(),
            is_primary,
            self.request.preferences.unwrap_or_default(),
            now,
        );
        let edge = session.edges().create(edge).await?;
        tracing::debug!(%guardian_id, %student_id, is_primary, "edge created");

        touched.insert(0, guardian_id);
        Ok(Applied::new(edge, AuditAction::Linked, touched))
    }
}
