use async_trait::async_trait;
use guardian_core_api::CommunicationFilter;
use sqlx::Database;
use uuid::Uuid;

use crate::models::communication_log::CommunicationLogModel;

#[async_trait]
pub trait CommunicationLogRepository<DB: Database>: Send + Sync {
    /// Log entries of one guardian narrowed by `filter`.
    async fn find_by_guardian_id(
        &self,
        guardian_id: Uuid,
        filter: &CommunicationFilter,
    ) -> Result<Vec<CommunicationLogModel>, Box<dyn std::error::Error + Send + Sync>>;
}
