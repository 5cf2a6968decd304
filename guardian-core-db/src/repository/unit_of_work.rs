use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use super::edge_repository::EdgeRepository;
use super::error::RepositoryResult;
use super::exist_by_ids::ExistByIds;

/// Source of transactional sessions over the edge store.
#[async_trait]
pub trait UnitOfWork<DB: Database>: Send + Sync {
    type Session: EdgeSession<DB>;

    async fn begin(&self) -> RepositoryResult<Self::Session>;
}

/// One transaction. Repositories obtained from a session all share it.
///
/// Dropping a session without calling `commit` discards its changes.
#[async_trait]
pub trait EdgeSession<DB: Database>: Send + Sync + Sized {
    type Edges: EdgeRepository<DB>;
    type Guardians: ExistByIds<DB>;
    type Students: ExistByIds<DB>;

    fn edges(&self) -> &Self::Edges;

    fn guardians(&self) -> &Self::Guardians;

    fn students(&self) -> &Self::Students;

    /// Serialize every session working on `student_id` until this one ends.
    async fn lock_student(&self, student_id: Uuid) -> RepositoryResult<()>;

    async fn commit(self) -> RepositoryResult<()>;

    async fn rollback(self) -> RepositoryResult<()>;
}
