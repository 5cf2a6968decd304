use async_trait::async_trait;
use guardian_core_db::{models::audit::AuditLogModel, repository::LoadBatch};
use postgres_unit_of_work::Executor;
use sqlx::Postgres;
use uuid::Uuid;

pub struct AuditLogRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditLogRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    pub async fn create(&self, audit_log: &AuditLogModel) -> Result<AuditLogModel, Box<dyn std::error::Error + Send + Sync>> {
        Self::create_impl(self, audit_log).await
    }

    /// Audit trail of one student, oldest first.
    pub async fn find_by_student_id(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AuditLogModel>, Box<dyn std::error::Error + Send + Sync>> {
        Self::find_by_student_id_impl(self, student_id).await
    }
}

#[async_trait]
impl LoadBatch<Postgres, AuditLogModel> for AuditLogRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<AuditLogModel>>, Box<dyn std::error::Error + Send + Sync>> {
        super::load_batch::load_batch_impl(&self.executor, ids).await
    }
}
