//! In-memory task store implementing every task repository port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{BlockerEdge, EdgeId, Task, TaskComment, TaskId, TimeLog},
    ports::{
        BlockerRepository, TaskActivityRepository, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
    query::{BlockerField, Predicate, TaskField, TaskQuery, matches, sort_records},
};

/// Thread-safe in-memory store for tasks, blocker edges, and activity.
///
/// Deleting a task that is still referenced by an edge, a comment, a time
/// log, or an external reference fails with
/// [`TaskRepositoryError::ReferenceConflict`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    edges: Vec<BlockerEdge>,
    comments: Vec<TaskComment>,
    time_logs: Vec<TimeLog>,
    external_references: HashMap<TaskId, usize>,
}

impl InMemoryTaskState {
    fn is_referenced(&self, id: TaskId) -> bool {
        self.edges.iter().any(|edge| edge.touches(id))
            || self.comments.iter().any(|comment| comment.task_id() == id)
            || self.time_logs.iter().any(|log| log.task_id() == id)
            || self.external_references.get(&id).is_some_and(|count| *count > 0)
    }
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `task_id` with a reference the lifecycle services cannot clear.
    ///
    /// Models a row in a collection outside the task engine that points at
    /// the task, such as a shared-link table.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn add_external_reference(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        *state.external_references.entry(task_id).or_default() += 1;
        Ok(())
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn update_if(
        &self,
        task: &Task,
        guard: &Predicate<TaskField>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if !matches(&*slot, guard)? {
            return Err(TaskRepositoryError::PreconditionFailed(task.id()));
        }
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut selected = Vec::new();
        for task in state.tasks.values() {
            if matches(task, query.filter())? {
                selected.push(task.clone());
            }
        }
        sort_records(&mut selected, query.sort());
        Ok(selected)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&id) {
            return Err(TaskRepositoryError::NotFound(id));
        }
        if state.is_referenced(id) {
            return Err(TaskRepositoryError::ReferenceConflict(id));
        }
        state.tasks.remove(&id);
        state.external_references.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BlockerRepository for InMemoryTaskStore {
    async fn insert_edge(&self, edge: &BlockerEdge) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        for endpoint in [edge.task_id(), edge.blocker_id()] {
            if !state.tasks.contains_key(&endpoint) {
                return Err(TaskRepositoryError::NotFound(endpoint));
            }
        }
        state.edges.push(edge.clone());
        Ok(())
    }

    async fn list_edges(
        &self,
        filter: &Predicate<BlockerField>,
    ) -> TaskRepositoryResult<Vec<BlockerEdge>> {
        let state = self.read()?;
        let mut selected = Vec::new();
        for edge in &state.edges {
            if matches(edge, filter)? {
                selected.push(edge.clone());
            }
        }
        Ok(selected)
    }

    async fn delete_edge(&self, id: EdgeId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.edges.retain(|edge| edge.id() != id);
        Ok(())
    }

    async fn delete_edges_touching(&self, task_id: TaskId) -> TaskRepositoryResult<usize> {
        let mut state = self.write()?;
        let before = state.edges.len();
        state.edges.retain(|edge| !edge.touches(task_id));
        Ok(before - state.edges.len())
    }
}

#[async_trait]
impl TaskActivityRepository for InMemoryTaskStore {
    async fn append_comment(&self, comment: &TaskComment) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&comment.task_id()) {
            return Err(TaskRepositoryError::NotFound(comment.task_id()));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>> {
        let state = self.read()?;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn record_time_log(&self, log: &TimeLog) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&log.task_id()) {
            return Err(TaskRepositoryError::NotFound(log.task_id()));
        }
        state.time_logs.push(log.clone());
        Ok(())
    }

    async fn time_logs_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TimeLog>> {
        let state = self.read()?;
        Ok(state
            .time_logs
            .iter()
            .filter(|log| log.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn purge_activity(&self, task_id: TaskId) -> TaskRepositoryResult<usize> {
        let mut state = self.write()?;
        let before = state.comments.len() + state.time_logs.len();
        state.comments.retain(|comment| comment.task_id() != task_id);
        state.time_logs.retain(|log| log.task_id() != task_id);
        Ok(before - state.comments.len() - state.time_logs.len())
    }
}
