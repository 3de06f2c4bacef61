//! Service-level errors and their caller-facing classification.

use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::TaskRepositoryError,
};
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// A bulk item was abandoned before it produced a result.
    #[error("bulk operation on task {0} was aborted")]
    Aborted(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Caller-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// No authenticated identity accompanied the call.
    AuthenticationRequired,
    /// The caller does not own the task.
    Unauthorized,
    /// The task cannot be claimed.
    NotAvailable,
    /// The blocker edge would break graph invariants.
    InvalidDependency,
    /// The operation does not apply to the task's current shape.
    InvalidOperation,
    /// Input failed validation.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The persistence substrate failed or timed out.
    SubstrateFailure,
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(err) => match err {
                TaskDomainError::AuthenticationRequired => TaskErrorKind::AuthenticationRequired,
                TaskDomainError::Unauthorized { .. } => TaskErrorKind::Unauthorized,
                TaskDomainError::NotAvailable(_) => TaskErrorKind::NotAvailable,
                TaskDomainError::InvalidDependency { .. } => TaskErrorKind::InvalidDependency,
                TaskDomainError::InvalidOperation { .. } => TaskErrorKind::InvalidOperation,
                TaskDomainError::InvalidUserId(_)
                | TaskDomainError::InvalidTeamId(_)
                | TaskDomainError::EmptyTitle
                | TaskDomainError::EmptyTag
                | TaskDomainError::EmptyComment
                | TaskDomainError::InvalidTimeLog => TaskErrorKind::Validation,
            },
            Self::Repository(err) => match err {
                TaskRepositoryError::NotFound(_) => TaskErrorKind::NotFound,
                TaskRepositoryError::UnsupportedPredicate(_) => TaskErrorKind::Validation,
                TaskRepositoryError::DuplicateTask(_)
                | TaskRepositoryError::ReferenceConflict(_)
                | TaskRepositoryError::PreconditionFailed(_)
                | TaskRepositoryError::Timeout(_)
                | TaskRepositoryError::Persistence(_) => TaskErrorKind::SubstrateFailure,
            },
            Self::NotFound(_) => TaskErrorKind::NotFound,
            Self::Aborted(_) => TaskErrorKind::SubstrateFailure,
        }
    }
}
