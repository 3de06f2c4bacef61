//! Task lifecycle orchestration service.
//!
//! Every operation takes the acting identity explicitly. Mutations are
//! validated by the domain before anything is persisted; side effects
//! (recurrence spawn, collaborator notification) run after the primary
//! write and never fail it.

use super::{
    TaskLifecycleError, TaskLifecycleResult, deadline::SubstrateDeadline,
    recurrence::RecurrenceEngine,
};
use crate::config::EngineConfig;
use crate::task::{
    domain::{
        ActingIdentity, Task, TaskComment, TaskDomainError, TaskDraft, TaskId, TaskPatch,
        TaskStatus, TeamId, TimeLog,
    },
    ports::{TaskEvent, TaskEventPublisher, TaskRepositoryError, TaskStore},
    query::{Predicate, SortKey, TaskField, TaskQuery, TaskView},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<S, P, C>
where
    S: TaskStore,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
    recurrence: RecurrenceEngine<S, C>,
    config: EngineConfig,
    deadline: SubstrateDeadline,
}

impl<S, P, C> Clone for TaskLifecycleService<S, P, C>
where
    S: TaskStore,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            publisher: Arc::clone(&self.publisher),
            clock: Arc::clone(&self.clock),
            recurrence: self.recurrence.clone(),
            config: self.config.clone(),
            deadline: self.deadline,
        }
    }
}

impl<S, P, C> TaskLifecycleService<S, P, C>
where
    S: TaskStore,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a service with default engine settings.
    #[must_use]
    pub fn new(store: Arc<S>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self::with_config(store, publisher, clock, EngineConfig::default())
    }

    /// Creates a service with explicit engine settings.
    #[must_use]
    pub fn with_config(
        store: Arc<S>,
        publisher: Arc<P>,
        clock: Arc<C>,
        config: EngineConfig,
    ) -> Self {
        let deadline = SubstrateDeadline::new(config.substrate_deadline());
        let recurrence = RecurrenceEngine::new(Arc::clone(&store), Arc::clone(&clock), deadline);
        Self {
            store,
            publisher,
            clock,
            recurrence,
            config,
            deadline,
        }
    }

    /// Returns the settings the service runs with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a task owned by the actor unless the draft names an owner.
    ///
    /// Publishes [`TaskEvent::Created`] once the record is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the draft is invalid and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create(
        &self,
        actor: &ActingIdentity,
        draft: TaskDraft,
    ) -> TaskLifecycleResult<Task> {
        let task = Task::create(draft, actor.user_id(), &*self.clock)?;
        self.deadline.run(self.store.create(&task)).await?;
        info!(task_id = %task.id(), user_id = %actor.user_id(), "created task");
        self.publisher
            .publish(TaskEvent::Created(Box::new(task.clone())));
        Ok(task)
    }

    /// Retrieves a task the actor may access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown identifier and
    /// [`TaskDomainError::Unauthorized`] on an ownership mismatch.
    pub async fn get(&self, actor: &ActingIdentity, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.load(id).await?;
        task.ensure_accessible_by(actor.user_id())?;
        Ok(task)
    }

    /// Lists the actor's tasks in `view`.
    ///
    /// An empty `sort` keeps the default newest-first order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn list(
        &self,
        actor: &ActingIdentity,
        view: TaskView,
        sort: Vec<SortKey<TaskField>>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let mut query = TaskQuery::visible_to(actor.user_id(), view);
        if !sort.is_empty() {
            query = query.with_sort_keys(sort);
        }
        Ok(self.deadline.run(self.store.list(&query)).await?)
    }

    /// Lists unclaimed pool tasks of `team`, oldest first.
    ///
    /// Team membership is checked by the caller's surrounding system.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn list_team_pool(
        &self,
        actor: &ActingIdentity,
        team: &TeamId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        debug!(user_id = %actor.user_id(), team_id = %team, "listing team pool");
        let query = TaskQuery::team_pool(team);
        Ok(self.deadline.run(self.store.list(&query)).await?)
    }

    /// Applies a partial update under the status rules.
    ///
    /// When the update moves the task into `done`, the recurrence successor
    /// is spawned and [`TaskEvent::Completed`] is published. Neither side
    /// effect can fail the update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, the actor may
    /// not modify it, the patch breaks a status rule, or persistence fails.
    pub async fn update(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.get(actor, id).await?;
        let transition = task.apply_patch(patch, &*self.clock)?;
        self.persist(&task).await?;
        debug!(task_id = %id, user_id = %actor.user_id(), "updated task");

        if transition.is_some_and(|change| change.entered_done()) {
            self.on_completed(actor, &task).await;
        }
        Ok(task)
    }

    /// Moves the task to the archive.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or cannot be stored.
    pub async fn archive(&self, actor: &ActingIdentity, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.get(actor, id).await?;
        task.archive(&*self.clock);
        self.persist(&task).await?;
        Ok(task)
    }

    /// Returns the task to the active soft-state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or cannot be stored.
    pub async fn restore(&self, actor: &ActingIdentity, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.get(actor, id).await?;
        task.restore(&*self.clock);
        self.persist(&task).await?;
        Ok(task)
    }

    /// Moves the task to the trash whatever its status or archive state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or cannot be stored.
    pub async fn move_to_trash(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.get(actor, id).await?;
        task.move_to_trash(&*self.clock);
        self.persist(&task).await?;
        Ok(task)
    }

    /// Removes the task permanently.
    ///
    /// When dependent rows block the delete, the blocker edges touching the
    /// task and its comments and time logs are removed and the delete is
    /// retried exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing or not owned
    /// by the actor. A failed retry surfaces as
    /// [`TaskLifecycleError::Repository`].
    pub async fn permanent_delete(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
    ) -> TaskLifecycleResult<()> {
        self.get(actor, id).await?;
        match self.deadline.run(self.store.delete(id)).await {
            Ok(()) => {
                info!(task_id = %id, user_id = %actor.user_id(), "deleted task permanently");
                return Ok(());
            }
            Err(TaskRepositoryError::ReferenceConflict(_)) => {}
            Err(err) => return Err(err.into()),
        }

        let edges = self.deadline.run(self.store.delete_edges_touching(id)).await?;
        let activity = self.deadline.run(self.store.purge_activity(id)).await?;
        warn!(
            task_id = %id,
            edges,
            activity,
            "removed dependent rows before retrying delete"
        );
        self.deadline.run(self.store.delete(id)).await?;
        info!(task_id = %id, user_id = %actor.user_id(), "deleted task permanently");
        Ok(())
    }

    /// Claims an unassigned team pool task for the actor.
    ///
    /// The write is conditional on the stored task still being unclaimed, so
    /// of two concurrent claims exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAvailable`] when the task is not an
    /// unclaimed pool task or another claim won the race.
    pub async fn claim(&self, actor: &ActingIdentity, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(id).await?;
        task.claim(actor.user_id(), &*self.clock)?;
        let guard = Predicate::equals(TaskField::Status, TaskStatus::Unassigned)
            .and(Predicate::is_empty(TaskField::AssignedTo));
        match self.deadline.run(self.store.update_if(&task, &guard)).await {
            Ok(()) => {
                info!(task_id = %id, user_id = %actor.user_id(), "claimed pool task");
                Ok(task)
            }
            Err(TaskRepositoryError::PreconditionFailed(_)) => {
                Err(TaskDomainError::NotAvailable(id).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Hands a claimed team task back to its pool.
    ///
    /// A non-blank `reason` is recorded as a comment after the release.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidOperation`] for tasks without a
    /// team and [`TaskDomainError::Unauthorized`] when the actor is not the
    /// assignee.
    pub async fn release(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
        reason: Option<&str>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(id).await?;
        task.release(actor.user_id(), &*self.clock)?;
        let audit = reason
            .filter(|text| !text.trim().is_empty())
            .map(|text| {
                TaskComment::new(
                    id,
                    actor.user_id().clone(),
                    format!("Released: {}", text.trim()),
                    &*self.clock,
                )
            })
            .transpose()?;
        self.persist(&task).await?;
        info!(task_id = %id, user_id = %actor.user_id(), "released task to pool");

        if let Some(comment) = audit {
            if let Err(err) = self.deadline.run(self.store.append_comment(&comment)).await {
                warn!(task_id = %id, error = %err, "failed to record release comment");
            }
        }
        Ok(task)
    }

    /// Adds a tag; adding an existing tag is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the tag is blank, the task is
    /// missing or not owned by the actor, or persistence fails.
    pub async fn add_tag(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
        tag: &str,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.get(actor, id).await?;
        if task.add_tag(tag, &*self.clock)? {
            self.persist(&task).await?;
        }
        Ok(task)
    }

    /// Records time spent on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when `minutes` is zero, the task is
    /// missing or not owned by the actor, or persistence fails.
    pub async fn log_time(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
        minutes: u32,
    ) -> TaskLifecycleResult<TimeLog> {
        let log = TimeLog::new(id, actor.user_id().clone(), minutes, &*self.clock)?;
        self.get(actor, id).await?;
        self.deadline.run(self.store.record_time_log(&log)).await?;
        Ok(log)
    }

    /// Lists time logged against a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or the query fails.
    pub async fn time_logs(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
    ) -> TaskLifecycleResult<Vec<TimeLog>> {
        self.get(actor, id).await?;
        Ok(self.deadline.run(self.store.time_logs_for(id)).await?)
    }

    /// Attaches a comment to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the body is blank, the task is
    /// missing or not owned by the actor, or persistence fails.
    pub async fn add_comment(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
        body: &str,
    ) -> TaskLifecycleResult<TaskComment> {
        let comment = TaskComment::new(id, actor.user_id().clone(), body, &*self.clock)?;
        self.get(actor, id).await?;
        self.deadline.run(self.store.append_comment(&comment)).await?;
        Ok(comment)
    }

    /// Lists comments on a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not owned by
    /// the actor, or the query fails.
    pub async fn comments(
        &self,
        actor: &ActingIdentity,
        id: TaskId,
    ) -> TaskLifecycleResult<Vec<TaskComment>> {
        self.get(actor, id).await?;
        Ok(self.deadline.run(self.store.comments_for(id)).await?)
    }

    async fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.deadline
            .run(self.store.find_by_id(id))
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    async fn persist(&self, task: &Task) -> TaskLifecycleResult<()> {
        Ok(self.deadline.run(self.store.update(task)).await?)
    }

    async fn on_completed(&self, actor: &ActingIdentity, task: &Task) {
        if let Err(err) = self.recurrence.spawn_successor(task).await {
            warn!(task_id = %task.id(), error = %err, "failed to spawn recurrence successor");
        }
        self.publisher.publish(TaskEvent::Completed {
            task_id: task.id(),
            user_id: actor.user_id().clone(),
        });
    }
}
