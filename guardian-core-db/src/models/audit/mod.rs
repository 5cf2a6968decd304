pub mod audit_log;
pub mod audit_link;

pub use audit_log::*;
pub use audit_link::*;
