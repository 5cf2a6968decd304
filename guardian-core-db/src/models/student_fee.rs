use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// # Documentation
/// - Fee expected from one student
/// - `term_id = None` is the student's default fee, used when no term-specific row exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentFeeModel {
    pub student_id: Uuid,
    pub term_id: Option<Uuid>,
    pub amount: Decimal,
}
