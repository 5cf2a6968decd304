use async_trait::async_trait;
use guardian_core_db::models::payment::PaymentModel;
use guardian_core_db::repository::PaymentRepository;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

pub struct PaymentRepositoryImpl {
    pool: Arc<PgPool>,
}

impl PaymentRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository<Postgres> for PaymentRepositoryImpl {
    async fn find_by_student_ids(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<PaymentModel>, Box<dyn std::error::Error + Send + Sync>> {
        if student_ids.is_empty() {
            return Ok(vec![]);
        }

        let payments = sqlx::query_as::<_, PaymentModel>(
            r#"
            SELECT id, student_id, amount, payment_date
            FROM payment
            WHERE student_id = ANY($1)
            "#,
        )
        .bind(student_ids)
        .fetch_all(&*self.pool)
        .await?;

        Ok(payments)
    }
}
