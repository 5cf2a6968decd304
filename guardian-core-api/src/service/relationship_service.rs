use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ActorContext, Edge, EdgeSpec, LinkRequest, PreferenceChannel};
use crate::error::RelationshipResult;

/// Mutation and query contract for guardian/student edges.
///
/// Every mutation runs in one transaction scoped to the student's edge set and
/// either commits with all invariants intact or leaves the store unchanged.
#[async_trait]
pub trait RelationshipService: Send + Sync {
    /// Attach a guardian to a student. A student's first guardian is always primary.
    async fn link(&self, actor: &ActorContext, request: LinkRequest) -> RelationshipResult<Edge>;

    /// Detach a guardian. Rejected for the last guardian and for the primary guardian.
    async fn unlink(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
    ) -> RelationshipResult<()>;

    /// Make `guardian_id` the student's only primary guardian (`value = true`).
    async fn set_primary(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
        value: bool,
    ) -> RelationshipResult<Edge>;

    async fn toggle_preference(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
        channel: PreferenceChannel,
        value: bool,
    ) -> RelationshipResult<Edge>;

    /// Replace a student's whole guardian list, repairing the primary flag.
    async fn sync_guardians(
        &self,
        actor: &ActorContext,
        student_id: Uuid,
        specs: Vec<EdgeSpec>,
    ) -> RelationshipResult<Vec<Edge>>;

    async fn edges_for_student(&self, student_id: Uuid) -> RelationshipResult<Vec<Edge>>;

    async fn edges_for_guardian(&self, guardian_id: Uuid) -> RelationshipResult<Vec<Edge>>;

    async fn primary_guardian(&self, student_id: Uuid) -> RelationshipResult<Option<Edge>>;

    /// Guardians of a student that opted into `channel`, primary first.
    async fn recipients_for_channel(
        &self,
        student_id: Uuid,
        channel: PreferenceChannel,
    ) -> RelationshipResult<Vec<Edge>>;
}
