//! Notification port for collaborators outside the task engine.
//!
//! Events are published after the primary mutation has committed. Publishing
//! never blocks and never fails the caller.

use crate::task::domain::{Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle event emitted by the task engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// A task was created.
    Created(Box<Task>),
    /// A task moved into `done`.
    Completed {
        /// Completed task.
        task_id: TaskId,
        /// User who completed it.
        user_id: UserId,
    },
}

/// Fire-and-forget sink for task events.
pub trait TaskEventPublisher: Send + Sync {
    /// Hands an event over for asynchronous delivery.
    fn publish(&self, event: TaskEvent);
}

/// Result type for collaborator callbacks.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Points and streak tracking, notified when tasks complete.
#[async_trait]
pub trait GamificationCollaborator: Send + Sync {
    /// Records that `user_id` completed `task_id`.
    async fn on_task_completed(&self, task_id: TaskId, user_id: UserId) -> CollaboratorResult<()>;
}

/// Automation rules, notified when tasks are created.
#[async_trait]
pub trait AutomationCollaborator: Send + Sync {
    /// Evaluates critical-task rules for a newly created task.
    async fn notify_critical_task(&self, task: &Task) -> CollaboratorResult<()>;
}

/// Error reported by a collaborator.
#[derive(Debug, Clone, Error)]
#[error("collaborator {collaborator} failed: {source}")]
pub struct CollaboratorError {
    /// Collaborator name used in logs.
    pub collaborator: &'static str,
    /// Underlying failure.
    pub source: Arc<dyn std::error::Error + Send + Sync>,
}

impl CollaboratorError {
    /// Wraps a collaborator failure.
    pub fn new(
        collaborator: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            collaborator,
            source: Arc::new(err),
        }
    }
}
