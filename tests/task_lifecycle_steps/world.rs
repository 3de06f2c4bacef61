//! Shared world state for task lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasklane::task::{
    adapters::memory::{InMemoryTaskStore, RecordingEventPublisher},
    domain::{ActingIdentity, TaskId, UserId},
    services::{DependencyGraphService, TaskLifecycleError, TaskLifecycleService},
};

/// Lifecycle service type used by the BDD world.
pub type WorldService =
    TaskLifecycleService<InMemoryTaskStore, RecordingEventPublisher, DefaultClock>;

/// Dependency graph type used by the BDD world.
pub type WorldGraph = DependencyGraphService<InMemoryTaskStore, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub service: WorldService,
    pub graph: WorldGraph,
    pub tasks: HashMap<String, TaskId>,
    pub last_outcome: Option<Result<(), TaskLifecycleError>>,
}

impl LifecycleWorld {
    /// Creates a world backed by a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            service: TaskLifecycleService::new(
                Arc::clone(&store),
                Arc::new(RecordingEventPublisher::new()),
                Arc::clone(&clock),
            ),
            graph: DependencyGraphService::new(store, clock),
            tasks: HashMap::new(),
            last_outcome: None,
        }
    }

    /// Looks up a task created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with `title` was created.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Builds an actor for the named user.
///
/// # Errors
///
/// Returns an error when `name` is not a valid user identifier.
pub fn as_user(name: &str) -> Result<ActingIdentity, eyre::Report> {
    Ok(ActingIdentity::new(UserId::new(name)?))
}

/// Default scenario actor, who creates every task.
///
/// # Errors
///
/// Propagates identifier validation errors.
pub fn owner() -> Result<ActingIdentity, eyre::Report> {
    as_user("alice")
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
