use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs of the relationship and aggregation services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Extra attempts after a `ConcurrencyConflict` before giving up.
    pub max_retries: u32,
    /// Base backoff between attempts; attempt `n` waits `n * retry_backoff_ms`.
    pub retry_backoff_ms: u64,
    pub summary_cache_capacity: u64,
    pub summary_cache_ttl_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 25,
            summary_cache_capacity: 10_000,
            summary_cache_ttl_secs: 300,
        }
    }
}

impl ServiceConfig {
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }

    pub fn summary_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.summary_cache_ttl_secs)
    }
}
