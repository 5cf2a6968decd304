use guardian_core_api::{InvariantKind, RelationshipError};
use std::error::Error;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the edge store that callers must tell apart.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Edge ({guardian_id}, {student_id}) already exists")]
    DuplicateEdge { guardian_id: Uuid, student_id: Uuid },

    /// Serialization failure, deadlock or constraint race. The transaction must be retried.
    #[error("Transaction conflict: {0}")]
    Conflict(String),

    #[error("Transaction has been consumed")]
    TransactionConsumed,

    #[error(transparent)]
    Backend(Box<dyn Error + Send + Sync>),
}

impl From<Box<dyn Error + Send + Sync>> for RepositoryError {
    fn from(err: Box<dyn Error + Send + Sync>) -> Self {
        RepositoryError::Backend(err)
    }
}

impl From<RepositoryError> for RelationshipError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEdge { .. } => {
                RelationshipError::InvariantViolation(InvariantKind::DuplicateEdge)
            }
            RepositoryError::Conflict(_) => RelationshipError::ConcurrencyConflict,
            RepositoryError::TransactionConsumed => {
                RelationshipError::Database("Transaction has been consumed".to_string())
            }
            RepositoryError::Backend(inner) => RelationshipError::Database(inner.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
