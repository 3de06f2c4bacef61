//! Spawning of successor records for completed recurring tasks.

use super::deadline::SubstrateDeadline;
use crate::task::{
    domain::Task,
    ports::{TaskRepositoryResult, TaskStore},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Creates the single next occurrence of a completed recurring task.
pub struct RecurrenceEngine<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    deadline: SubstrateDeadline,
}

impl<S, C> Clone for RecurrenceEngine<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            deadline: self.deadline,
        }
    }
}

impl<S, C> RecurrenceEngine<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    pub(crate) const fn new(store: Arc<S>, clock: Arc<C>, deadline: SubstrateDeadline) -> Self {
        Self {
            store,
            clock,
            deadline,
        }
    }

    /// Persists the successor of `completed`, if its recurrence yields one.
    ///
    /// Returns `Ok(None)` when the task does not recur, has no reference
    /// date, or the next occurrence lies past the end boundary.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the successor cannot be stored.
    pub async fn spawn_successor(&self, completed: &Task) -> TaskRepositoryResult<Option<Task>> {
        let Some(successor) = completed.recurrence_successor(&*self.clock) else {
            return Ok(None);
        };
        self.deadline.run(self.store.create(&successor)).await?;
        info!(
            task_id = %completed.id(),
            successor_id = %successor.id(),
            due_date = ?successor.due_date(),
            "spawned recurrence successor"
        );
        Ok(Some(successor))
    }
}
