use guardian_core_db::models::guardian::{GuardianModel, NewGuardian};
use guardian_core_db::utils::normalize_phone_number;
use crate::utils::TryFromRow;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::{GuardianRepositoryImpl, GUARDIAN_COLUMNS};

impl GuardianRepositoryImpl {
    /// Inserts unless the normalized phone number is taken, then reads the winner.
    pub(super) async fn find_or_create_by_phone_impl(
        repo: &GuardianRepositoryImpl,
        guardian: NewGuardian,
    ) -> Result<(GuardianModel, bool), Box<dyn Error + Send + Sync>> {
        let phone_number = normalize_phone_number(&guardian.phone_number);
        if phone_number.is_empty() {
            return Err("phone_number must not be empty".into());
        }

        let insert = format!(
            r#"
            INSERT INTO guardian (id, first_name, last_name, phone_number, email, national_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (phone_number) DO NOTHING
            RETURNING {GUARDIAN_COLUMNS}
            "#
        );
        let select = format!("SELECT {GUARDIAN_COLUMNS} FROM guardian WHERE phone_number = $1");

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let inserted = sqlx::query(&insert)
            .bind(Uuid::new_v4())
            .bind(guardian.first_name.trim())
            .bind(guardian.last_name.trim())
            .bind(&phone_number)
            .bind(guardian.email.as_deref())
            .bind(guardian.national_id.as_deref())
            .fetch_optional(&mut **transaction)
            .await?;
        if let Some(row) = inserted {
            let model = GuardianModel::try_from_row(&row)?;
            tracing::info!(guardian_id = %model.id, "guardian created");
            return Ok((model, true));
        }

        let row = sqlx::query(&select)
            .bind(&phone_number)
            .fetch_one(&mut **transaction)
            .await?;
        Ok((GuardianModel::try_from_row(&row)?, false))
    }
}
