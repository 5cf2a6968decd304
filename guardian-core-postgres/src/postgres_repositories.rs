use guardian_core_api::AuditSink;
use guardian_core_service::{AggregationSources, Clock, GuardianCoreServices, ServiceConfig};
use sqlx::{PgPool, Postgres};
use std::sync::Arc;

use crate::repository::audit::PostgresAuditSink;
use crate::repository::communication::CommunicationLogRepositoryImpl;
use crate::repository::finance::{FeeRepositoryImpl, PaymentRepositoryImpl, TermRepositoryImpl};
use crate::unit_of_work::PostgresUnitOfWork;

/// Entry point wiring every Postgres-backed collaborator over one pool.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    pub fn unit_of_work(&self) -> Arc<PostgresUnitOfWork> {
        Arc::new(PostgresUnitOfWork::new(self.pool.clone()))
    }

    pub fn aggregation_sources(&self) -> AggregationSources<Postgres> {
        AggregationSources {
            payments: Arc::new(PaymentRepositoryImpl::new(self.pool.clone())),
            fees: Arc::new(FeeRepositoryImpl::new(self.pool.clone())),
            terms: Arc::new(TermRepositoryImpl::new(self.pool.clone())),
            communication_logs: Arc::new(CommunicationLogRepositoryImpl::new(self.pool.clone())),
        }
    }

    pub fn audit_sink(&self) -> Arc<dyn AuditSink> {
        Arc::new(PostgresAuditSink::new(self.pool.clone()))
    }

    /// Relationship and aggregation services over this pool.
    pub fn services(
        &self,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> GuardianCoreServices<Postgres, PostgresUnitOfWork> {
        GuardianCoreServices::new(
            self.unit_of_work(),
            self.aggregation_sources(),
            self.audit_sink(),
            clock,
            config,
        )
    }
}
