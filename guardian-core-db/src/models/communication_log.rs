use chrono::{DateTime, Utc};
use guardian_core_api::CommunicationType;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - One message or call sent to a guardian, optionally about one student
///
/// # Finder Method
/// - find_by_guardian_id (with CommunicationFilter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CommunicationLogModel {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub student_id: Option<Uuid>,
    pub communication_type: CommunicationType,
    pub sent_at: DateTime<Utc>,
}

impl Identifiable for CommunicationLogModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
