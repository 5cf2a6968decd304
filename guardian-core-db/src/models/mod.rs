pub mod identifiable;
pub mod audit;
pub mod guardian;
pub mod payment;
pub mod communication_log;
pub mod term;
pub mod student_fee;

// Re-exports
pub use identifiable::*;
pub use audit::*;
pub use guardian::*;
pub use payment::*;
pub use communication_log::*;
pub use term::*;
pub use student_fee::*;
