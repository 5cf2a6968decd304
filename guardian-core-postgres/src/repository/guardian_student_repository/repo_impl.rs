use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guardian_core_api::{Edge, EdgePatch, PreferenceChannel, Preferences};
use guardian_core_db::repository::{EdgeRepository, RepositoryResult};
use crate::utils::{get_heapless_string, TryFromRow};
use postgres_unit_of_work::Executor;
use sqlx::{postgres::PgRow, Postgres, Row};
use std::error::Error;
use uuid::Uuid;

/// Columns selected and returned for every edge query.
pub(super) const EDGE_COLUMNS: &str = "guardian_id, student_id, is_primary, relationship_type, \
    receives_sms, receives_email, receives_whatsapp, receives_portal, receives_calls, \
    created_at, updated_at";

pub struct GuardianStudentRepositoryImpl {
    pub executor: Executor,
}

impl GuardianStudentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for Edge {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut preferences = Preferences::default();
        for channel in PreferenceChannel::ALL {
            preferences = preferences.with(channel, row.try_get(channel.column_name())?);
        }
        Ok(Edge {
            guardian_id: row.try_get("guardian_id")?,
            student_id: row.try_get("student_id")?,
            is_primary: row.try_get("is_primary")?,
            relationship_type: get_heapless_string(row, "relationship_type")?,
            preferences,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl EdgeRepository<Postgres> for GuardianStudentRepositoryImpl {
    async fn create(&self, edge: Edge) -> RepositoryResult<Edge> {
        Self::create_impl(self, edge).await
    }

    async fn find(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<Option<Edge>> {
        Self::find_impl(self, guardian_id, student_id).await
    }

    async fn delete(&self, guardian_id: Uuid, student_id: Uuid) -> RepositoryResult<bool> {
        Self::delete_impl(self, guardian_id, student_id).await
    }

    async fn update(
        &self,
        guardian_id: Uuid,
        student_id: Uuid,
        patch: &EdgePatch,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<Edge>> {
        Self::update_impl(self, guardian_id, student_id, patch, now).await
    }

    async fn list_by_student(&self, student_id: Uuid) -> RepositoryResult<Vec<Edge>> {
        Self::list_by_student_impl(self, student_id).await
    }

    async fn list_by_guardian(&self, guardian_id: Uuid) -> RepositoryResult<Vec<Edge>> {
        Self::list_by_guardian_impl(self, guardian_id).await
    }
}
