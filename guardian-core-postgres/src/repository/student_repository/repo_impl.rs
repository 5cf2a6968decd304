use async_trait::async_trait;
use guardian_core_db::repository::ExistByIds;
use postgres_unit_of_work::Executor;
use sqlx::Postgres;
use std::collections::HashSet;
use std::error::Error;
use uuid::Uuid;

/// Students are owned by enrollment; this crate only checks that they exist.
pub struct StudentRepositoryImpl {
    pub executor: Executor,
}

impl StudentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ExistByIds<Postgres> for StudentRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let query = sqlx::query_scalar::<_, Uuid>("SELECT id FROM student WHERE id = ANY($1)").bind(ids);

        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let found: HashSet<Uuid> = query.fetch_all(&mut **transaction).await?.into_iter().collect();

        Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
    }
}
