//! Directed "blocks" relation between tasks.

use super::{DependencyViolation, EdgeId, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Edge meaning `blocker_id` must complete before `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerEdge {
    id: EdgeId,
    task_id: TaskId,
    blocker_id: TaskId,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl BlockerEdge {
    /// Creates a new edge owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDependency`] with
    /// [`DependencyViolation::SelfBlock`] when both endpoints are the same
    /// task.
    pub fn new(
        task_id: TaskId,
        blocker_id: TaskId,
        owner: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if task_id == blocker_id {
            return Err(TaskDomainError::InvalidDependency {
                task_id,
                blocker_id,
                violation: DependencyViolation::SelfBlock,
            });
        }
        Ok(Self {
            id: EdgeId::new(),
            task_id,
            blocker_id,
            owner,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an edge from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: EdgeId,
        task_id: TaskId,
        blocker_id: TaskId,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            blocker_id,
            owner,
            created_at,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the dependent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task that must complete first.
    #[must_use]
    pub const fn blocker_id(&self) -> TaskId {
        self.blocker_id
    }

    /// Returns the user that recorded the edge.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when either endpoint is `task_id`.
    #[must_use]
    pub fn touches(&self, task_id: TaskId) -> bool {
        self.task_id == task_id || self.blocker_id == task_id
    }
}
