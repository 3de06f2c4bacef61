//! Error types for task domain validation and lifecycle rules.

use super::{TaskId, UserId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// No authenticated user accompanies the request.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The user identifier is empty or malformed.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),

    /// The team identifier is empty.
    #[error("invalid team identifier '{0}'")]
    InvalidTeamId(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A tag is empty after trimming.
    #[error("tag must not be empty")]
    EmptyTag,

    /// A comment body is empty after trimming.
    #[error("comment body must not be empty")]
    EmptyComment,

    /// A time log must cover at least one minute.
    #[error("time log must record a positive number of minutes")]
    InvalidTimeLog,

    /// The acting user does not own the task.
    #[error("user {user_id} is not authorized to act on task {task_id}")]
    Unauthorized {
        /// Task the user attempted to act on.
        task_id: TaskId,
        /// User that attempted the action.
        user_id: UserId,
    },

    /// The task is not an unclaimed pool task.
    #[error("task {0} is not available to claim")]
    NotAvailable(TaskId),

    /// The operation does not apply to the task in its current shape.
    #[error("invalid operation on task {task_id}: {reason}")]
    InvalidOperation {
        /// Task the operation targeted.
        task_id: TaskId,
        /// Human-readable explanation.
        reason: String,
    },

    /// The requested blocker edge would violate graph invariants.
    #[error("invalid dependency {task_id} <- {blocker_id}: {violation}")]
    InvalidDependency {
        /// Dependent task.
        task_id: TaskId,
        /// Proposed blocker.
        blocker_id: TaskId,
        /// Which invariant the edge would break.
        violation: DependencyViolation,
    },
}

/// Graph invariant a rejected blocker edge would have broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DependencyViolation {
    /// A task cannot block itself.
    #[error("a task cannot block itself")]
    SelfBlock,
    /// The exact edge is already recorded.
    #[error("the dependency already exists")]
    Duplicate,
    /// The reverse edge exists, forming a two-node cycle.
    #[error("the reverse dependency already exists")]
    DirectCycle,
    /// The task is already reachable from the blocker.
    #[error("the dependency would close a cycle")]
    Cycle,
}

/// Error returned while parsing task enumerations from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseTaskEnumError {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// Raw value that failed to parse.
    pub value: String,
}

impl ParseTaskEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Builds a [`TaskDomainError::InvalidOperation`] for the given task.
pub(crate) fn invalid_operation(task_id: TaskId, reason: impl Into<String>) -> TaskDomainError {
    TaskDomainError::InvalidOperation {
        task_id,
        reason: reason.into(),
    }
}
