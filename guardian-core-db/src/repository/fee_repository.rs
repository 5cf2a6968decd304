use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::student_fee::StudentFeeModel;

#[async_trait]
pub trait FeeRepository<DB: Database>: Send + Sync {
    /// Fee rows of the given students that apply to `term_id`: rows for that term plus default rows.
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
        term_id: Option<Uuid>,
    ) -> Result<Vec<StudentFeeModel>, Box<dyn std::error::Error + Send + Sync>>;
}
