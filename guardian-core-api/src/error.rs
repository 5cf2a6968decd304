use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Rules of the guardian/student edge set that a mutation would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvariantKind {
    MinOneGuardianRequired,
    CannotUnlinkPrimary,
    DuplicateEdge,
    CannotDemotePrimary,
}

impl InvariantKind {
    pub fn code(&self) -> &'static str {
        match self {
            InvariantKind::MinOneGuardianRequired => "MIN_ONE_GUARDIAN_REQUIRED",
            InvariantKind::CannotUnlinkPrimary => "CANNOT_UNLINK_PRIMARY",
            InvariantKind::DuplicateEdge => "DUPLICATE_EDGE",
            InvariantKind::CannotDemotePrimary => "CANNOT_DEMOTE_PRIMARY",
        }
    }
}

impl std::fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum NotFoundKind {
    Guardian { id: Uuid },
    Student { id: Uuid },
    Edge { guardian_id: Uuid, student_id: Uuid },
}

impl std::fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundKind::Guardian { id } => write!(f, "guardian {id}"),
            NotFoundKind::Student { id } => write!(f, "student {id}"),
            NotFoundKind::Edge {
                guardian_id,
                student_id,
            } => write!(f, "link between guardian {guardian_id} and student {student_id}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RelationshipError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(InvariantKind),

    #[error("Not found: {0}")]
    NotFound(NotFoundKind),

    #[error("Concurrent modification of the same student, retry the operation")]
    ConcurrencyConflict,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RelationshipError {
    /// Shorthand for the `NOT_LINKED` case.
    pub fn not_linked(guardian_id: Uuid, student_id: Uuid) -> Self {
        RelationshipError::NotFound(NotFoundKind::Edge {
            guardian_id,
            student_id,
        })
    }

    /// Stable machine-readable code for callers that render errors.
    pub fn code(&self) -> &'static str {
        match self {
            RelationshipError::InvariantViolation(kind) => kind.code(),
            RelationshipError::NotFound(NotFoundKind::Edge { .. }) => "NOT_LINKED",
            RelationshipError::NotFound(_) => "NOT_FOUND",
            RelationshipError::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            RelationshipError::Validation(_) => "VALIDATION_ERROR",
            RelationshipError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, RelationshipError::ConcurrencyConflict)
    }
}

impl From<validator::ValidationErrors> for RelationshipError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RelationshipError::Validation(errors.to_string())
    }
}

pub type RelationshipResult<T> = Result<T, RelationshipError>;
