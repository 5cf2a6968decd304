pub mod config;
pub mod postgres_repositories;
pub mod repository;
pub mod unit_of_work;
pub mod utils;

pub use config::PostgresConfig;
pub use postgres_repositories::PostgresRepositories;
pub use repository::audit::PostgresAuditSink;
pub use unit_of_work::{PostgresSession, PostgresUnitOfWork};

#[cfg(test)]
pub mod test_helper;
