use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CommunicationFilter, CommunicationStats, FinancialSummary};
use crate::error::RelationshipResult;

/// Read-only aggregates over a guardian's linked students.
///
/// Missing related data degrades to zero values; only backend failures are errors.
#[async_trait]
pub trait AggregationService: Send + Sync {
    async fn financial_summary(&self, guardian_id: Uuid) -> RelationshipResult<FinancialSummary>;

    async fn communication_stats(
        &self,
        guardian_id: Uuid,
        filter: CommunicationFilter,
    ) -> RelationshipResult<CommunicationStats>;
}
