use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::payment::PaymentModel;

#[async_trait]
pub trait PaymentRepository<DB: Database>: Send + Sync {
    /// All payments of the given students, in no particular order.
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<PaymentModel>, Box<dyn std::error::Error + Send + Sync>>;
}
