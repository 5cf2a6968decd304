pub mod error;
pub mod exist_by_ids;
pub mod load_batch;
pub mod edge_repository;
pub mod guardian_repository;
pub mod payment_repository;
pub mod communication_log_repository;
pub mod term_repository;
pub mod fee_repository;
pub mod unit_of_work;

// Re-exports
pub use error::*;
pub use exist_by_ids::*;
pub use load_batch::*;
pub use edge_repository::*;
pub use guardian_repository::*;
pub use payment_repository::*;
pub use communication_log_repository::*;
pub use term_repository::*;
pub use fee_repository::*;
pub use unit_of_work::*;
