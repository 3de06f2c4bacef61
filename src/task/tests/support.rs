//! Shared fixtures for task unit tests.

use std::sync::{Arc, Mutex};

use crate::task::{
    adapters::memory::{InMemoryTaskStore, RecordingEventPublisher},
    domain::{ActingIdentity, UserId},
    services::{DependencyGraphService, TaskLifecycleService},
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a settable instant.
#[derive(Debug, Clone)]
pub(super) struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock lock");
        *guard += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
                .single()
                .expect("valid instant"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub(super) type TestService =
    TaskLifecycleService<InMemoryTaskStore, RecordingEventPublisher, FixedClock>;
pub(super) type TestGraph = DependencyGraphService<InMemoryTaskStore, FixedClock>;

/// A lifecycle service and dependency graph sharing one store.
pub(super) struct Harness {
    pub store: Arc<InMemoryTaskStore>,
    pub events: Arc<RecordingEventPublisher>,
    pub clock: Arc<FixedClock>,
    pub service: TestService,
    pub graph: TestGraph,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(InMemoryTaskStore::new());
    let events = Arc::new(RecordingEventPublisher::new());
    let clock = Arc::new(FixedClock::default());
    let service = TaskLifecycleService::new(
        Arc::clone(&store),
        Arc::clone(&events),
        Arc::clone(&clock),
    );
    let graph = DependencyGraphService::new(Arc::clone(&store), Arc::clone(&clock));
    Harness {
        store,
        events,
        clock,
        service,
        graph,
    }
}

pub(super) fn actor(name: &str) -> ActingIdentity {
    ActingIdentity::new(user(name))
}

pub(super) fn user(name: &str) -> UserId {
    UserId::new(name).expect("valid user id")
}
