use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Database;

use crate::models::term::TermModel;

#[async_trait]
pub trait TermRepository<DB: Database>: Send + Sync {
    /// The term whose inclusive date range contains `date`; the latest-starting one on overlap.
    async fn find_containing(
        &self,
        date: NaiveDate,
    ) -> Result<Option<TermModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// The term with the most recent `start_date`.
    async fn find_latest(&self) -> Result<Option<TermModel>, Box<dyn std::error::Error + Send + Sync>>;
}
