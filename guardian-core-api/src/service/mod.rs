pub mod aggregation_service;
pub mod audit_sink;
pub mod relationship_service;

pub use aggregation_service::*;
pub use audit_sink::*;
pub use relationship_service::*;
