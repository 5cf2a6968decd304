pub mod aggregation_engine;
pub mod audit;
pub mod cache;
pub mod clock;
pub mod config;
pub mod invariant_enforcer;
pub mod preference_matrix;

#[cfg(test)]
pub mod test_helper;

pub use aggregation_engine::{AggregationEngine, AggregationSources};
pub use audit::TracingAuditSink;
pub use cache::SummaryCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ServiceConfig;
pub use invariant_enforcer::InvariantEnforcer;
pub use preference_matrix::TogglePreference;

use guardian_core_api::AuditSink;
use guardian_core_db::repository::UnitOfWork;
use sqlx::Database;
use std::sync::Arc;

/// Relationship and aggregation services wired over one unit of work.
///
/// Both services share one summary cache, so committed mutations invalidate
/// what the aggregation side serves.
pub struct GuardianCoreServices<DB: Database, U: UnitOfWork<DB>> {
    pub relationships: Arc<InvariantEnforcer<DB, U>>,
    pub aggregations: Arc<AggregationEngine<DB, U>>,
    pub cache: Arc<SummaryCache>,
}

impl<DB: Database, U: UnitOfWork<DB>> GuardianCoreServices<DB, U> {
    pub fn new(
        unit_of_work: Arc<U>,
        sources: AggregationSources<DB>,
        audit_sink: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let cache = Arc::new(SummaryCache::new(&config));
        let relationships = InvariantEnforcer::new(unit_of_work.clone(), audit_sink, clock.clone(), config)
            .with_cache(cache.clone());
        let aggregations = AggregationEngine::new(unit_of_work, sources, clock).with_cache(cache.clone());
        Self {
            relationships: Arc::new(relationships),
            aggregations: Arc::new(aggregations),
            cache,
        }
    }
}
