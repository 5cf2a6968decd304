use async_trait::async_trait;
use guardian_core_db::models::student_fee::StudentFeeModel;
use guardian_core_db::repository::FeeRepository;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

pub struct FeeRepositoryImpl {
    pool: Arc<PgPool>,
}

impl FeeRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeeRepository<Postgres> for FeeRepositoryImpl {
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
        term_id: Option<Uuid>,
    ) -> Result<Vec<StudentFeeModel>, Box<dyn std::error::Error + Send + Sync>> {
        if student_ids.is_empty() {
            return Ok(vec![]);
        }

        // A NULL $2 matches no term row, leaving only the defaults.
        let fees = sqlx::query_as::<_, StudentFeeModel>(
            r#"
            SELECT student_id, term_id, amount
            FROM student_fee
            WHERE student_id = ANY($1) AND (term_id IS NULL OR term_id = $2)
            "#,
        )
        .bind(student_ids)
        .bind(term_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(fees)
    }
}
