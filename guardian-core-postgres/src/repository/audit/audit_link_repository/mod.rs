pub mod repo_impl;
pub mod create;
pub mod find_by_audit_log_id;

pub use repo_impl::AuditLinkRepositoryImpl;
