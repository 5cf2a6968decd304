use guardian_core_api::FinancialSummary;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::config::ServiceConfig;

/// Per-guardian cache of financial summaries.
///
/// Every invalidation bumps an epoch; a summary computed across an epoch change
/// is not stored, so a mutation committed mid-computation cannot leave a stale entry.
pub struct SummaryCache {
    summaries: Cache<Uuid, FinancialSummary>,
    epoch: AtomicU64,
}

impl SummaryCache {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            summaries: Cache::builder()
                .max_capacity(config.summary_cache_capacity)
                .time_to_live(config.summary_cache_ttl())
                .build(),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub async fn get(&self, guardian_id: &Uuid) -> Option<FinancialSummary> {
        self.summaries.get(guardian_id).await
    }

    /// Stores `summary` unless an invalidation happened since `epoch` was read.
    pub async fn insert_if_current(&self, epoch: u64, summary: FinancialSummary) -> bool {
        if self.epoch() != epoch {
            return false;
        }
        self.summaries.insert(summary.guardian_id, summary).await;
        true
    }

    pub async fn invalidate(&self, guardian_ids: &[Uuid]) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        for guardian_id in guardian_ids {
            self.summaries.invalidate(guardian_id).await;
        }
    }
}
