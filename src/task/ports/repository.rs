//! Repository ports forming the persistence gateway for tasks.

use crate::task::{
    domain::{BlockerEdge, EdgeId, Task, TaskComment, TaskId, TimeLog},
    query::{BlockerField, Predicate, QueryError, TaskField, TaskQuery},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the ID exists.
    async fn create(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes only if the stored record still satisfies `guard`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::PreconditionFailed`] when the stored
    /// record no longer matches and [`TaskRepositoryError::NotFound`] when it
    /// does not exist.
    async fn update_if(&self, task: &Task, guard: &Predicate<TaskField>)
    -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `query` in its sort order.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ReferenceConflict`] while dependent rows
    /// still reference the task and [`TaskRepositoryError::NotFound`] when it
    /// does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Blocker edge persistence contract.
#[async_trait]
pub trait BlockerRepository: Send + Sync {
    /// Stores a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when either endpoint is
    /// missing.
    async fn insert_edge(&self, edge: &BlockerEdge) -> TaskRepositoryResult<()>;

    /// Lists edges matching `filter`.
    async fn list_edges(
        &self,
        filter: &Predicate<BlockerField>,
    ) -> TaskRepositoryResult<Vec<BlockerEdge>>;

    /// Deletes one edge. Deleting a missing edge is not an error.
    async fn delete_edge(&self, id: EdgeId) -> TaskRepositoryResult<()>;

    /// Deletes every edge with `task_id` at either end, returning the count.
    async fn delete_edges_touching(&self, task_id: TaskId) -> TaskRepositoryResult<usize>;
}

/// Comment and time-log persistence contract.
#[async_trait]
pub trait TaskActivityRepository: Send + Sync {
    /// Stores a comment.
    async fn append_comment(&self, comment: &TaskComment) -> TaskRepositoryResult<()>;

    /// Lists comments on a task, oldest first.
    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>>;

    /// Stores a time log entry.
    async fn record_time_log(&self, log: &TimeLog) -> TaskRepositoryResult<()>;

    /// Lists time logged against a task, oldest first.
    async fn time_logs_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TimeLog>>;

    /// Deletes all comments and time logs of a task, returning the count.
    async fn purge_activity(&self, task_id: TaskId) -> TaskRepositoryResult<usize>;
}

/// Every repository the lifecycle services need, behind one bound.
pub trait TaskStore: TaskRepository + BlockerRepository + TaskActivityRepository {}

impl<T> TaskStore for T where T: TaskRepository + BlockerRepository + TaskActivityRepository {}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Dependent rows still reference the task.
    #[error("task {0} is still referenced by dependent records")]
    ReferenceConflict(TaskId),

    /// A conditional update lost against a concurrent change.
    #[error("task {0} changed concurrently")]
    PreconditionFailed(TaskId),

    /// The adapter cannot evaluate the supplied predicate.
    #[error(transparent)]
    UnsupportedPredicate(#[from] QueryError),

    /// The call exceeded its deadline.
    #[error("persistence call timed out after {0} ms")]
    Timeout(u64),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
