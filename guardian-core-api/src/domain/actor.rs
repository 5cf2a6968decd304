use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user on whose behalf a mutation runs.
///
/// Passed explicitly into every mutating operation and copied into the
/// emitted audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: Uuid,
}

impl ActorContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
