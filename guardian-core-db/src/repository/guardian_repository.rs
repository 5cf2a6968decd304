use async_trait::async_trait;
use sqlx::Database;

use crate::models::guardian::{GuardianModel, NewGuardian};

/// Guardian lookups keyed by the normalized phone number.
#[async_trait]
pub trait GuardianRepository<DB: Database>: Send + Sync {
    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<GuardianModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// First-or-create on the phone number.
    ///
    /// # Returns
    /// * `Ok((guardian, true))` - A new guardian was inserted
    /// * `Ok((guardian, false))` - An existing guardian was returned unchanged
    async fn find_or_create_by_phone(
        &self,
        guardian: NewGuardian,
    ) -> Result<(GuardianModel, bool), Box<dyn std::error::Error + Send + Sync>>;
}
