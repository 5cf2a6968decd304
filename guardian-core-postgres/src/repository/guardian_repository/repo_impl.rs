use async_trait::async_trait;
use guardian_core_db::models::guardian::{GuardianModel, NewGuardian};
use guardian_core_db::repository::{ExistByIds, GuardianRepository, LoadBatch};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use postgres_unit_of_work::Executor;
use sqlx::{postgres::PgRow, Postgres, Row};
use std::error::Error;
use uuid::Uuid;

pub(super) const GUARDIAN_COLUMNS: &str =
    "id, first_name, last_name, phone_number, email, national_id, is_active, user_id";

pub struct GuardianRepositoryImpl {
    pub executor: Executor,
}

impl GuardianRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for GuardianModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(GuardianModel {
            id: row.try_get("id")?,
            first_name: get_heapless_string(row, "first_name")?,
            last_name: get_heapless_string(row, "last_name")?,
            phone_number: get_heapless_string(row, "phone_number")?,
            email: get_optional_heapless_string(row, "email")?,
            national_id: get_optional_heapless_string(row, "national_id")?,
            is_active: row.try_get("is_active")?,
            user_id: row.try_get("user_id")?,
        })
    }
}

#[async_trait]
impl ExistByIds<Postgres> for GuardianRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        Self::exist_by_ids_impl(self, ids).await
    }
}

#[async_trait]
impl LoadBatch<Postgres, GuardianModel> for GuardianRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> Result<Vec<Option<GuardianModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}

#[async_trait]
impl GuardianRepository<Postgres> for GuardianRepositoryImpl {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<GuardianModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_phone_number_impl(self, phone_number).await
    }

    async fn find_or_create_by_phone(
        &self,
        guardian: NewGuardian,
    ) -> Result<(GuardianModel, bool), Box<dyn Error + Send + Sync>> {
        Self::find_or_create_by_phone_impl(self, guardian).await
    }
}
