pub mod checks;
pub mod link;
pub mod mutation;
pub mod set_primary;
pub mod sync_guardians;
pub mod unlink;

use async_trait::async_trait;
use guardian_core_api::{
    relationship_type, ActorContext, AuditEvent, AuditSink, Edge, EdgeSpec, LinkRequest,
    PreferenceChannel, RelationshipResult, RelationshipService,
};
use guardian_core_db::repository::{EdgeRepository, EdgeSession, UnitOfWork};
use sqlx::Database;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::cache::SummaryCache;
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::preference_matrix::{recipients, TogglePreference};

pub use link::Link;
pub use mutation::{Applied, Mutation};
pub use set_primary::SetPrimary;
pub use sync_guardians::{SyncGuardians, TargetEdge};
pub use unlink::Unlink;

/// The only writer of the edge set.
///
/// Each mutation runs in its own session: lock the student, apply, commit.
/// A `ConcurrencyConflict` is retried up to `ServiceConfig::max_retries` times.
/// After commit the touched guardians' summaries are invalidated and one
/// audit event is emitted.
pub struct InvariantEnforcer<DB: Database, U: UnitOfWork<DB>> {
    unit_of_work: Arc<U>,
    audit_sink: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    cache: Option<Arc<SummaryCache>>,
    config: ServiceConfig,
    _db: PhantomData<fn() -> DB>,
}

impl<DB: Database, U: UnitOfWork<DB>> InvariantEnforcer<DB, U> {
    pub fn new(
        unit_of_work: Arc<U>,
        audit_sink: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            unit_of_work,
            audit_sink,
            clock,
            cache: None,
            config,
            _db: PhantomData,
        }
    }

    pub fn with_cache(mut self, cache: Arc<SummaryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn execute<M>(&self, actor: &ActorContext, mutation: M) -> RelationshipResult<M::Output>
    where
        M: Mutation<DB, U::Session>,
    {
        let mut attempt = 0;
        loop {
            match self.try_once(&mutation).await {
                Ok(applied) => {
                    tracing::info!(
                        operation = mutation.name(),
                        student_id = %mutation.student_id(),
                        guardians = ?applied.guardian_ids,
                        attempt,
                        "edge set committed"
                    );
                    let Applied {
                        output,
                        action,
                        guardian_ids,
                        channel,
                    } = applied;

                    if let Some(cache) = &self.cache {
                        cache.invalidate(&guardian_ids).await;
                    }

                    let mut event = AuditEvent::new(
                        *actor,
                        action,
                        mutation.student_id(),
                        guardian_ids,
                        self.clock.now(),
                    );
                    if let Some(channel) = channel {
                        event = event.with_channel(channel);
                    }
                    if let Err(err) = self.audit_sink.record(event).await {
                        tracing::warn!(
                            operation = mutation.name(),
                            error = %err,
                            "audit sink rejected event, mutation stays committed"
                        );
                    }
                    return Ok(output);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        operation = mutation.name(),
                        student_id = %mutation.student_id(),
                        attempt,
                        "concurrent modification, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_once<M>(&self, mutation: &M) -> RelationshipResult<Applied<M::Output>>
    where
        M: Mutation<DB, U::Session>,
    {
        let session = self.unit_of_work.begin().await?;
        let now = self.clock.now();

        let result: RelationshipResult<Applied<M::Output>> = async {
            session.lock_student(mutation.student_id()).await?;
            mutation.apply(&session, now).await
        }
        .await;

        match result {
            Ok(applied) => {
                session.commit().await?;
                Ok(applied)
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback().await {
                    tracing::warn!(operation = mutation.name(), error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn close_read(&self, session: U::Session) {
        if let Err(err) = session.rollback().await {
            tracing::warn!(error = %err, "failed to close read session");
        }
    }
}

#[async_trait]
impl<DB: Database, U: UnitOfWork<DB> + 'static> RelationshipService for InvariantEnforcer<DB, U> {
    #[tracing::instrument(skip(self, actor, request), fields(guardian_id = %request.guardian_id, student_id = %request.student_id))]
    async fn link(&self, actor: &ActorContext, request: LinkRequest) -> RelationshipResult<Edge> {
        request.validate()?;
        let relationship_type = relationship_type(&request.relationship_type)?;
        self.execute(
            actor,
            Link {
                request,
                relationship_type,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, actor))]
    async fn unlink(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
    ) -> RelationshipResult<()> {
        self.execute(
            actor,
            Unlink {
                guardian_id,
                student_id,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, actor))]
    async fn set_primary(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
        value: bool,
    ) -> RelationshipResult<Edge> {
        self.execute(
            actor,
            SetPrimary {
                guardian_id,
                student_id,
                value,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, actor))]
    async fn toggle_preference(
        &self,
        actor: &ActorContext,
        guardian_id: Uuid,
        student_id: Uuid,
        channel: PreferenceChannel,
        value: bool,
    ) -> RelationshipResult<Edge> {
        self.execute(
            actor,
            TogglePreference {
                guardian_id,
                student_id,
                channel,
                value,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, actor, specs), fields(entries = specs.len()))]
    async fn sync_guardians(
        &self,
        actor: &ActorContext,
        student_id: Uuid,
        specs: Vec<EdgeSpec>,
    ) -> RelationshipResult<Vec<Edge>> {
        let sync = SyncGuardians::prepare(student_id, specs)?;
        self.execute(actor, sync).await
    }

    async fn edges_for_student(&self, student_id: Uuid) -> RelationshipResult<Vec<Edge>> {
        let session = self.unit_of_work.begin().await?;
        let edges = session.edges().list_by_student(student_id).await;
        self.close_read(session).await;
        Ok(edges?)
    }

    async fn edges_for_guardian(&self, guardian_id: Uuid) -> RelationshipResult<Vec<Edge>> {
        let session = self.unit_of_work.begin().await?;
        let edges = session.edges().list_by_guardian(guardian_id).await;
        self.close_read(session).await;
        Ok(edges?)
    }

    async fn primary_guardian(&self, student_id: Uuid) -> RelationshipResult<Option<Edge>> {
        let edges = self.edges_for_student(student_id).await?;
        Ok(edges.into_iter().find(|edge| edge.is_primary))
    }

    async fn recipients_for_channel(
        &self,
        student_id: Uuid,
        channel: PreferenceChannel,
    ) -> RelationshipResult<Vec<Edge>> {
        let edges = self.edges_for_student(student_id).await?;
        Ok(recipients(edges, channel))
    }
}
