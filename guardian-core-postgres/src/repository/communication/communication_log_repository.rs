use async_trait::async_trait;
use guardian_core_api::CommunicationFilter;
use guardian_core_db::models::communication_log::CommunicationLogModel;
use guardian_core_db::repository::CommunicationLogRepository;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

pub struct CommunicationLogRepositoryImpl {
    pool: Arc<PgPool>,
}

impl CommunicationLogRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunicationLogRepository<Postgres> for CommunicationLogRepositoryImpl {
    async fn find_by_guardian_id(
        &self,
        guardian_id: Uuid,
        filter: &CommunicationFilter,
    ) -> Result<Vec<CommunicationLogModel>, Box<dyn std::error::Error + Send + Sync>> {
        let logs = sqlx::query_as::<_, CommunicationLogModel>(
            r#"
            SELECT id, guardian_id, student_id, communication_type, sent_at
            FROM communication_log
            WHERE guardian_id = $1
              AND ($2::uuid IS NULL OR student_id = $2)
              AND ($3::communication_type IS NULL OR communication_type = $3)
              AND ($4::timestamptz IS NULL OR sent_at >= $4)
              AND ($5::timestamptz IS NULL OR sent_at <= $5)
            ORDER BY sent_at
            "#,
        )
        .bind(guardian_id)
        .bind(filter.student_id)
        .bind(filter.communication_type)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&*self.pool)
        .await?;

        Ok(logs)
    }
}
