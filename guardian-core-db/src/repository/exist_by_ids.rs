use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

/// Generic repository trait for checking existence of multiple entities by their IDs
///
/// Used by the relationship core to turn unknown guardian or student ids into
/// `NotFound` errors before any edge is written.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
#[async_trait]
pub trait ExistByIds<DB: Database>: Send + Sync {
    /// Check existence of multiple entities by their unique identifiers
    ///
    /// # Returns
    /// * `Ok(Vec<(Uuid, bool)>)` - Each requested ID paired with its existence status, in input order
    /// * `Err` - An error if the query could not be executed
    async fn exist_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, bool)>, Box<dyn std::error::Error + Send + Sync>>;
}
