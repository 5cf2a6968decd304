use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{AuditAction, PreferenceChannel, RelationshipResult};
use guardian_core_db::repository::EdgeSession;
use sqlx::Database;
use uuid::Uuid;

/// Result of a mutation applied inside a session, before commit.
pub struct Applied<T> {
    pub output: T,
    pub action: AuditAction,
    /// Guardians whose edge to the student was created, changed or removed.
    pub guardian_ids: Vec<Uuid>,
    pub channel: Option<PreferenceChannel>,
}

impl<T> Applied<T> {
    pub fn new(output: T, action: AuditAction, guardian_ids: Vec<Uuid>) -> Self {
        let mut guardian_ids = guardian_ids;
        let mut seen = std::collections::HashSet::new();
        guardian_ids.retain(|id| seen.insert(*id));
        Self {
            output,
            action,
            guardian_ids,
            channel: None,
        }
    }

    pub fn with_channel(mut self, channel: PreferenceChannel) -> Self {
        self.channel = Some(channel);
        self
    }
}

/// One edge-set mutation scoped to a single student.
///
/// `apply` runs after the student's edge set is locked and must leave every
/// invariant intact or return an error; the caller owns commit and rollback.
#[async_trait]
pub trait Mutation<DB: Database, S: EdgeSession<DB>>: Send + Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    fn student_id(&self) -> Uuid;

    async fn apply(&self, session: &S, now: DateTime<Utc>) -> RelationshipResult<Applied<Self::Output>>;
}
