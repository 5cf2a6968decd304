use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

/// Balance of one linked student within a guardian's financial summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentBalance {
    pub student_id: Uuid,
    pub fee_amount: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
    pub last_payment_date: Option<NaiveDate>,
}

impl StudentBalance {
    pub fn is_cleared(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

/// Aggregated fee position across every student linked to one guardian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub guardian_id: Uuid,
    /// Name of the term used to resolve fees, if any term exists.
    pub term: Option<String>,
    pub total_fees: Decimal,
    pub total_paid: Decimal,
    pub total_balance: Decimal,
    pub cleared_count: u32,
    pub uncleared_count: u32,
    pub last_payment_date: Option<NaiveDate>,
    pub students: Vec<StudentBalance>,
}

impl FinancialSummary {
    pub fn empty(guardian_id: Uuid, term: Option<String>) -> Self {
        Self {
            guardian_id,
            term,
            total_fees: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            cleared_count: 0,
            uncleared_count: 0,
            last_payment_date: None,
            students: Vec::new(),
        }
    }

    pub fn push(&mut self, student: StudentBalance) {
        self.total_fees += student.fee_amount;
        self.total_paid += student.amount_paid;
        self.total_balance += student.balance;
        if student.is_cleared() {
            self.cleared_count += 1;
        } else {
            self.uncleared_count += 1;
        }
        self.last_payment_date = self.last_payment_date.max(student.last_payment_date);
        self.students.push(student);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "communication_type", rename_all = "PascalCase"))]
pub enum CommunicationType {
    Sms,
    Email,
    Whatsapp,
    Portal,
    Call,
    Other,
}

impl std::fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunicationType::Sms => write!(f, "Sms"),
            CommunicationType::Email => write!(f, "Email"),
            CommunicationType::Whatsapp => write!(f, "Whatsapp"),
            CommunicationType::Portal => write!(f, "Portal"),
            CommunicationType::Call => write!(f, "Call"),
            CommunicationType::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for CommunicationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sms" => Ok(CommunicationType::Sms),
            "email" => Ok(CommunicationType::Email),
            "whatsapp" => Ok(CommunicationType::Whatsapp),
            "portal" => Ok(CommunicationType::Portal),
            "call" | "calls" => Ok(CommunicationType::Call),
            "other" => Ok(CommunicationType::Other),
            _ => Err(()),
        }
    }
}

/// Optional narrowing of a guardian's communication log.
///
/// `from` and `to` are inclusive bounds on `sent_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationFilter {
    pub student_id: Option<Uuid>,
    pub communication_type: Option<CommunicationType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl CommunicationFilter {
    pub fn for_student(mut self, student_id: Uuid) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn of_type(mut self, communication_type: CommunicationType) -> Self {
        self.communication_type = Some(communication_type);
        self
    }

    pub fn between(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn matches(
        &self,
        student_id: Option<Uuid>,
        communication_type: CommunicationType,
        sent_at: DateTime<Utc>,
    ) -> bool {
        self.student_id.map_or(true, |id| student_id == Some(id))
            && self
                .communication_type
                .map_or(true, |t| t == communication_type)
            && self.from.map_or(true, |from| sent_at >= from)
            && self.to.map_or(true, |to| sent_at <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationStats {
    pub guardian_id: Uuid,
    pub total: u64,
    pub by_type: BTreeMap<CommunicationType, u64>,
    pub last_contact: Option<DateTime<Utc>>,
}

impl CommunicationStats {
    pub fn empty(guardian_id: Uuid) -> Self {
        Self {
            guardian_id,
            total: 0,
            by_type: BTreeMap::new(),
            last_contact: None,
        }
    }

    pub fn record(&mut self, communication_type: CommunicationType, sent_at: DateTime<Utc>) {
        self.total += 1;
        *self.by_type.entry(communication_type).or_insert(0) += 1;
        self.last_contact = self.last_contact.max(Some(sent_at));
    }

    pub fn count(&self, communication_type: CommunicationType) -> u64 {
        self.by_type.get(&communication_type).copied().unwrap_or(0)
    }
}
