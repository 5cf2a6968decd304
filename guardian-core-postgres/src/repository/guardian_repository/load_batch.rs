use guardian_core_db::models::guardian::GuardianModel;
use guardian_core_db::utils::order_by_ids;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{GuardianRepositoryImpl, GUARDIAN_COLUMNS};

impl GuardianRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &GuardianRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<GuardianModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let query = format!("SELECT {GUARDIAN_COLUMNS} FROM guardian WHERE id = ANY($1)");
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(&query).bind(ids).fetch_all(&mut **transaction).await?
        };

        let mut guardians = Vec::with_capacity(rows.len());
        for row in &rows {
            guardians.push(GuardianModel::try_from_row(row)?);
        }
        Ok(order_by_ids(ids, guardians))
    }
}
