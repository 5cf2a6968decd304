pub mod communication_log_repository;

pub use communication_log_repository::CommunicationLogRepositoryImpl;
