pub mod actor;
pub mod audit;
pub mod edge;
pub mod preference;
pub mod summary;

pub use actor::*;
pub use audit::*;
pub use edge::*;
pub use preference::*;
pub use summary::*;
