//! Event publisher that records events in memory.

use std::sync::{Arc, Mutex};

use crate::task::ports::{TaskEvent, TaskEventPublisher};

/// Publisher that keeps every published event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventPublisher {
    events: Arc<Mutex<Vec<TaskEvent>>>,
}

impl RecordingEventPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl TaskEventPublisher for RecordingEventPublisher {
    fn publish(&self, event: TaskEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
