pub mod audit_log_repository;
pub mod audit_link_repository;
pub mod audit_sink;

pub use audit_link_repository::AuditLinkRepositoryImpl;
pub use audit_log_repository::AuditLogRepositoryImpl;
pub use audit_sink::PostgresAuditSink;

use postgres_unit_of_work::Executor;
use std::sync::Arc;

/// Audit repositories sharing one executor.
pub struct AuditRepositories {
    pub audit_log_repository: Arc<AuditLogRepositoryImpl>,
    pub audit_link_repository: Arc<AuditLinkRepositoryImpl>,
}

impl AuditRepositories {
    pub fn new(executor: &Executor) -> Self {
        Self {
            audit_log_repository: Arc::new(AuditLogRepositoryImpl::new(executor.clone())),
            audit_link_repository: Arc::new(AuditLinkRepositoryImpl::new(executor.clone())),
        }
    }
}
