//! Maintenance of the "is blocked by" relation between tasks.

use super::{TaskLifecycleError, TaskLifecycleResult, deadline::SubstrateDeadline};
use crate::config::{CycleDetection, EngineConfig};
use crate::task::{
    domain::{
        ActingIdentity, BlockerEdge, DependencyViolation, EdgeId, Task, TaskDomainError, TaskId,
    },
    ports::{TaskRepositoryResult, TaskStore},
    query::{BlockerField, Predicate},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// A blocker edge together with the task at its other end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The edge itself.
    pub edge: BlockerEdge,
    /// The blocker for upstream queries, the dependent for downstream ones.
    pub task: Task,
}

/// Service managing blocker edges with cycle prevention.
pub struct DependencyGraphService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    policy: CycleDetection,
    deadline: SubstrateDeadline,
}

impl<S, C> Clone for DependencyGraphService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            deadline: self.deadline,
        }
    }
}

impl<S, C> DependencyGraphService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with default settings (transitive cycle checks).
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(store, clock, &EngineConfig::default())
    }

    /// Creates a service using the cycle policy and deadline of `config`.
    #[must_use]
    pub fn with_config(store: Arc<S>, clock: Arc<C>, config: &EngineConfig) -> Self {
        Self {
            store,
            clock,
            policy: config.cycle_detection,
            deadline: SubstrateDeadline::new(config.substrate_deadline()),
        }
    }

    /// Returns the tasks that must complete before `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or the query fails.
    pub async fn get_blockers(
        &self,
        actor: &ActingIdentity,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<Dependency>> {
        self.load_accessible(actor, task_id).await?;
        let edges = self
            .edges(&Predicate::equals(BlockerField::TaskId, task_id))
            .await?;
        self.resolve(edges, BlockerEdge::blocker_id).await
    }

    /// Returns the tasks waiting on `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or the query fails.
    pub async fn get_blocked_tasks(
        &self,
        actor: &ActingIdentity,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<Dependency>> {
        self.load_accessible(actor, task_id).await?;
        let edges = self
            .edges(&Predicate::equals(BlockerField::BlockerId, task_id))
            .await?;
        self.resolve(edges, BlockerEdge::task_id).await
    }

    /// Records that `blocker_id` must complete before `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDependency`] for a self-block, an
    /// existing edge, a reverse edge, or (under
    /// [`CycleDetection::Transitive`]) any edge that would close a cycle.
    /// Returns [`TaskLifecycleError::NotFound`] when either task is missing.
    pub async fn add_blocker(
        &self,
        actor: &ActingIdentity,
        task_id: TaskId,
        blocker_id: TaskId,
    ) -> TaskLifecycleResult<BlockerEdge> {
        let edge = BlockerEdge::new(task_id, blocker_id, actor.user_id().clone(), &*self.clock)?;
        self.load_accessible(actor, task_id).await?;
        self.load(blocker_id).await?;

        let reject = |violation| TaskDomainError::InvalidDependency {
            task_id,
            blocker_id,
            violation,
        };
        if self.edge_exists(task_id, blocker_id).await? {
            return Err(reject(DependencyViolation::Duplicate).into());
        }
        if self.edge_exists(blocker_id, task_id).await? {
            return Err(reject(DependencyViolation::DirectCycle).into());
        }
        if self.policy == CycleDetection::Transitive && self.reaches(blocker_id, task_id).await? {
            return Err(reject(DependencyViolation::Cycle).into());
        }

        self.deadline.run(self.store.insert_edge(&edge)).await?;
        info!(%task_id, %blocker_id, edge_id = %edge.id(), "added blocker");
        Ok(edge)
    }

    /// Deletes an edge. Removing an edge that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn remove_blocker(
        &self,
        actor: &ActingIdentity,
        edge_id: EdgeId,
    ) -> TaskLifecycleResult<()> {
        self.deadline.run(self.store.delete_edge(edge_id)).await?;
        debug!(%edge_id, user_id = %actor.user_id(), "removed blocker");
        Ok(())
    }

    /// Returns `true` when `target` is upstream of `start`, following each
    /// task to its own blockers one level at a time.
    async fn reaches(&self, start: TaskId, target: TaskId) -> TaskRepositoryResult<bool> {
        let mut visited = HashSet::from([start]);
        let mut frontier = vec![start];
        while !frontier.is_empty() {
            let filter = Predicate::or(
                frontier
                    .iter()
                    .map(|id| Predicate::equals(BlockerField::TaskId, *id)),
            );
            let mut next = Vec::new();
            for edge in self.edges(&filter).await? {
                let upstream = edge.blocker_id();
                if upstream == target {
                    return Ok(true);
                }
                if visited.insert(upstream) {
                    next.push(upstream);
                }
            }
            frontier = next;
        }
        Ok(false)
    }

    async fn edge_exists(&self, task_id: TaskId, blocker_id: TaskId) -> TaskRepositoryResult<bool> {
        let filter = Predicate::equals(BlockerField::TaskId, task_id)
            .and(Predicate::equals(BlockerField::BlockerId, blocker_id));
        Ok(!self.edges(&filter).await?.is_empty())
    }

    async fn edges(
        &self,
        filter: &Predicate<BlockerField>,
    ) -> TaskRepositoryResult<Vec<BlockerEdge>> {
        self.deadline.run(self.store.list_edges(filter)).await
    }

    async fn resolve(
        &self,
        edges: Vec<BlockerEdge>,
        other_end: fn(&BlockerEdge) -> TaskId,
    ) -> TaskLifecycleResult<Vec<Dependency>> {
        let mut dependencies = Vec::with_capacity(edges.len());
        for edge in edges {
            let related = other_end(&edge);
            match self.deadline.run(self.store.find_by_id(related)).await? {
                Some(task) => dependencies.push(Dependency { edge, task }),
                None => debug!(task_id = %related, "skipping edge to missing task"),
            }
        }
        Ok(dependencies)
    }

    async fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.deadline
            .run(self.store.find_by_id(id))
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    async fn load_accessible(&self, actor: &ActingIdentity, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.load(id).await?;
        task.ensure_accessible_by(actor.user_id())?;
        Ok(task)
    }
}
