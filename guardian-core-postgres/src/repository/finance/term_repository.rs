use async_trait::async_trait;
use chrono::NaiveDate;
use guardian_core_db::models::term::TermModel;
use guardian_core_db::repository::TermRepository;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;

pub struct TermRepositoryImpl {
    pool: Arc<PgPool>,
}

impl TermRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TermRepository<Postgres> for TermRepositoryImpl {
    async fn find_containing(
        &self,
        date: NaiveDate,
    ) -> Result<Option<TermModel>, Box<dyn std::error::Error + Send + Sync>> {
        let term = sqlx::query_as::<_, TermModel>(
            r#"
            SELECT id, name, academic_year, start_date, end_date
            FROM term
            WHERE start_date <= $1 AND end_date >= $1
            ORDER BY start_date DESC, id
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(term)
    }

    async fn find_latest(&self) -> Result<Option<TermModel>, Box<dyn std::error::Error + Send + Sync>> {
        let term = sqlx::query_as::<_, TermModel>(
            r#"
            SELECT id, name, academic_year, start_date, end_date
            FROM term
            ORDER BY start_date DESC, id
            LIMIT 1
            "#,
        )
        .fetch_optional(&*self.pool)
        .await?;

        Ok(term)
    }
}
