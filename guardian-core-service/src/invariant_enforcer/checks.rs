use chrono::{DateTime, Utc};
use guardian_core_api::{Edge, EdgePatch, NotFoundKind, RelationshipError, RelationshipResult};
use guardian_core_db::repository::{EdgeRepository, EdgeSession, ExistByIds, RepositoryError};
use sqlx::Database;
use uuid::Uuid;

fn backend(err: Box<dyn std::error::Error + Send + Sync>) -> RelationshipError {
    RepositoryError::Backend(err).into()
}

pub async fn ensure_student_exists<DB: Database, S: EdgeSession<DB>>(
    session: &S,
    student_id: Uuid,
) -> RelationshipResult<()> {
    let found = session
        .students()
        .exist_by_ids(&[student_id])
        .await
        .map_err(backend)?;
    match found.into_iter().find(|(_, exists)| !exists) {
        Some((id, _)) => Err(RelationshipError::NotFound(NotFoundKind::Student { id })),
        None => Ok(()),
    }
}

pub async fn ensure_guardians_exist<DB: Database, S: EdgeSession<DB>>(
    session: &S,
    guardian_ids: &[Uuid],
) -> RelationshipResult<()> {
    let found = session
        .guardians()
        .exist_by_ids(guardian_ids)
        .await
        .map_err(backend)?;
    match found.into_iter().find(|(_, exists)| !exists) {
        Some((id, _)) => Err(RelationshipError::NotFound(NotFoundKind::Guardian { id })),
        None => Ok(()),
    }
}

/// Clears `is_primary` on every edge in `edges` except `keep`'s.
///
/// Returns the demoted guardians. Runs before any promotion so the
/// one-primary-per-student index never sees two rows.
pub async fn demote_primaries<DB: Database, S: EdgeSession<DB>>(
    session: &S,
    edges: &[Edge],
    keep: Option<Uuid>,
    now: DateTime<Utc>,
) -> RelationshipResult<Vec<Uuid>> {
    let mut demoted = Vec::new();
    for edge in edges
        .iter()
        .filter(|edge| edge.is_primary && Some(edge.guardian_id) != keep)
    {
        session
            .edges()
            .update(edge.guardian_id, edge.student_id, &EdgePatch::primary(false), now)
            .await?
            .ok_or_else(|| RelationshipError::not_linked(edge.guardian_id, edge.student_id))?;
        demoted.push(edge.guardian_id);
    }
    Ok(demoted)
}
