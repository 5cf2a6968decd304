use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - Guardian identity record, owned by the admission and guardian-creation flows
/// - `phone_number` is the natural dedup key and is stored normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianModel {
    /// # Finder Methods
    /// - load_batch
    /// - exist_by_ids
    pub id: Uuid,

    pub first_name: HeaplessString<100>,
    pub last_name: HeaplessString<100>,

    /// # Finder Method
    /// - find_by_phone_number
    pub phone_number: HeaplessString<20>,

    pub email: Option<HeaplessString<255>>,
    pub national_id: Option<HeaplessString<50>>,
    pub is_active: bool,

    /// # Documentation
    /// - Optional link to the guardian's login account
    pub user_id: Option<Uuid>,
}

impl Identifiable for GuardianModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Input of the first-or-create guardian flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuardian {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub national_id: Option<String>,
}
