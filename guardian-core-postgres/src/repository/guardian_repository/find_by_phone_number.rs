use guardian_core_db::models::guardian::GuardianModel;
use guardian_core_db::utils::normalize_phone_number;
use crate::utils::TryFromRow;
use std::error::Error;

use super::repo_impl::{GuardianRepositoryImpl, GUARDIAN_COLUMNS};

impl GuardianRepositoryImpl {
    pub(super) async fn find_by_phone_number_impl(
        repo: &GuardianRepositoryImpl,
        phone_number: &str,
    ) -> Result<Option<GuardianModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("SELECT {GUARDIAN_COLUMNS} FROM guardian WHERE phone_number = $1");
        let row = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(&query)
                .bind(normalize_phone_number(phone_number))
                .fetch_optional(&mut **transaction)
                .await?
        };

        row.as_ref().map(GuardianModel::try_from_row).transpose()
    }
}
