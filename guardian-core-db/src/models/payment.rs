use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Identifiable;

/// # Documentation
/// - Fee payment made for one student, read-only for this crate
///
/// # Finder Method
/// - find_by_student_ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PaymentModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

impl Identifiable for PaymentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
