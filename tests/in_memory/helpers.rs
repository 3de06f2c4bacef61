//! Shared fixtures for in-memory task engine integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasklane::task::{
    adapters::memory::{InMemoryTaskStore, RecordingEventPublisher},
    domain::{ActingIdentity, UserId},
    services::{DependencyGraphService, TaskLifecycleService},
};

/// Lifecycle service wired to the in-memory adapters.
pub type MemoryService =
    TaskLifecycleService<InMemoryTaskStore, RecordingEventPublisher, DefaultClock>;

/// Dependency graph service wired to the in-memory store.
pub type MemoryGraph = DependencyGraphService<InMemoryTaskStore, DefaultClock>;

/// Services sharing one store.
pub struct Engine {
    pub store: Arc<InMemoryTaskStore>,
    pub events: Arc<RecordingEventPublisher>,
    pub service: MemoryService,
    pub graph: MemoryGraph,
}

/// Provides a fresh engine for each test.
#[fixture]
pub fn engine() -> Engine {
    let store = Arc::new(InMemoryTaskStore::new());
    let events = Arc::new(RecordingEventPublisher::new());
    let clock = Arc::new(DefaultClock);
    Engine {
        service: TaskLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&events),
            Arc::clone(&clock),
        ),
        graph: DependencyGraphService::new(Arc::clone(&store), clock),
        store,
        events,
    }
}

/// Builds an authenticated actor.
///
/// # Panics
///
/// Panics when `name` is not a valid user identifier.
#[must_use]
pub fn actor(name: &str) -> ActingIdentity {
    ActingIdentity::new(UserId::new(name).expect("valid user id"))
}
