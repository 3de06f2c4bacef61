//! Bulk variants of the lifecycle operations.
//!
//! Items run concurrently, bounded by the configured bulk concurrency.
//! There is no atomicity across items: each id gets its own outcome.

use super::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{ActingIdentity, Task, TaskId, TaskPatch},
    ports::{TaskEventPublisher, TaskStore},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Result of one item of a bulk operation.
#[derive(Debug)]
pub struct BulkItemOutcome<T> {
    /// Task the item targeted.
    pub task_id: TaskId,
    /// What happened to it.
    pub result: TaskLifecycleResult<T>,
}

/// Per-item results of a bulk operation, in input order.
#[derive(Debug)]
#[must_use]
pub struct BulkReport<T> {
    outcomes: Vec<BulkItemOutcome<T>>,
}

impl<T> BulkReport<T> {
    /// Returns every outcome in input order.
    #[must_use]
    pub fn outcomes(&self) -> &[BulkItemOutcome<T>] {
        &self.outcomes
    }

    /// Consumes the report, yielding its outcomes.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<BulkItemOutcome<T>> {
        self.outcomes
    }

    /// Number of items that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|item| item.result.is_ok()).count()
    }

    /// Items that failed, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (TaskId, &TaskLifecycleError)> {
        self.outcomes
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|err| (item.task_id, err)))
    }

    /// Returns `true` when every item succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|item| item.result.is_ok())
    }
}

impl<S, P, C> TaskLifecycleService<S, P, C>
where
    S: TaskStore + 'static,
    P: TaskEventPublisher + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Applies `patch` to every task in `ids`.
    pub async fn bulk_update(
        &self,
        actor: &ActingIdentity,
        ids: &[TaskId],
        patch: &TaskPatch,
    ) -> BulkReport<Task> {
        self.fan_out(ids, |service, id| {
            let item_actor = actor.clone();
            let item_patch = patch.clone();
            async move { service.update(&item_actor, id, item_patch).await }
        })
        .await
    }

    /// Moves every task in `ids` to the trash.
    pub async fn bulk_move_to_trash(
        &self,
        actor: &ActingIdentity,
        ids: &[TaskId],
    ) -> BulkReport<Task> {
        self.fan_out(ids, |service, id| {
            let item_actor = actor.clone();
            async move { service.move_to_trash(&item_actor, id).await }
        })
        .await
    }

    /// Restores every task in `ids` to the active soft-state.
    pub async fn bulk_restore(&self, actor: &ActingIdentity, ids: &[TaskId]) -> BulkReport<Task> {
        self.fan_out(ids, |service, id| {
            let item_actor = actor.clone();
            async move { service.restore(&item_actor, id).await }
        })
        .await
    }

    /// Permanently deletes every task in `ids`.
    pub async fn bulk_permanent_delete(
        &self,
        actor: &ActingIdentity,
        ids: &[TaskId],
    ) -> BulkReport<()> {
        self.fan_out(ids, |service, id| {
            let item_actor = actor.clone();
            async move { service.permanent_delete(&item_actor, id).await }
        })
        .await
    }

    /// Adds `tag` to every task in `ids`.
    pub async fn bulk_add_tag(
        &self,
        actor: &ActingIdentity,
        ids: &[TaskId],
        tag: &str,
    ) -> BulkReport<Task> {
        self.fan_out(ids, |service, id| {
            let item_actor = actor.clone();
            let item_tag = tag.to_owned();
            async move { service.add_tag(&item_actor, id, &item_tag).await }
        })
        .await
    }

    async fn fan_out<T, F, Fut>(&self, ids: &[TaskId], operation: F) -> BulkReport<T>
    where
        T: Send + 'static,
        F: Fn(Self, TaskId) -> Fut,
        Fut: Future<Output = TaskLifecycleResult<T>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.config().bulk_concurrency.max(1)));
        let mut join_set = JoinSet::new();
        let mut slots: Vec<Option<TaskLifecycleResult<T>>> = ids.iter().map(|_| None).collect();

        for (index, id) in ids.iter().copied().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                warn!(task_id = %id, "bulk semaphore closed");
                break;
            };
            let item = operation(self.clone(), id);
            join_set.spawn(async move {
                let _permit = permit;
                (index, item.await)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(result);
                    }
                }
                Err(err) => warn!(error = %err, "bulk item task failed to complete"),
            }
        }

        let outcomes: Vec<BulkItemOutcome<T>> = ids
            .iter()
            .copied()
            .zip(slots)
            .map(|(task_id, slot)| BulkItemOutcome {
                task_id,
                result: slot.unwrap_or_else(|| Err(TaskLifecycleError::Aborted(task_id))),
            })
            .collect();
        debug!(items = outcomes.len(), "bulk operation finished");
        BulkReport { outcomes }
    }
}
