use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{Edge, EdgePatch};
use sqlx::Database;
use uuid::Uuid;

use super::error::RepositoryResult;

/// Storage primitives for guardian/student edges.
///
/// Implementations enforce only the uniqueness of `(guardian_id, student_id)`.
/// Primary-guardian and minimum-guardian rules belong to the caller.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
#[async_trait]
pub trait EdgeRepository<DB: Database>: Send + Sync {
    /// Insert a new edge.
    ///
    /// # Returns
    /// * `Err(RepositoryError::DuplicateEdge)` - If the pair already exists
    async fn create(&self, edge: Edge) -> RepositoryResult<Edge>;

    async fn find(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<Option<Edge>>;

    /// # Returns
    /// * `Ok(true)` - If a row was removed
    async fn delete(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<bool>;

    /// Apply `patch` to an existing edge, stamping `updated_at` with `now`.
    ///
    /// # Returns
    /// * `Ok(Some(edge))` - The updated edge
    /// * `Ok(None)` - If the pair does not exist
    async fn update(
        &self,
        guardian_id: Uuid,
        student_id: Uuid,
        patch: &EdgePatch,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<Edge>>;

    /// Edges of one student ordered by `created_at`, then guardian id.
    async fn list_by_student(&self, student_id: Uuid) -> RepositoryResult<Vec<Edge>>;

    /// Edges of one guardian ordered by `created_at`, then student id.
    async fn list_by_guardian(&self, guardian_id: Uuid) -> RepositoryResult<Vec<Edge>>;
}
