//! Asynchronous delivery of task events to collaborators.
//!
//! The dispatcher owns a bounded queue drained by one detached worker.
//! Publishing enqueues without waiting; a full or closed queue drops the
//! event with a warning. Collaborator failures are logged and never reach
//! the caller that triggered the event.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::task::ports::{
    AutomationCollaborator, GamificationCollaborator, TaskEvent, TaskEventPublisher,
};

/// Collaborators that receive task events.
#[derive(Clone, Default)]
pub struct Collaborators {
    gamification: Option<Arc<dyn GamificationCollaborator>>,
    automation: Option<Arc<dyn AutomationCollaborator>>,
}

impl Collaborators {
    /// Creates an empty set; events are then consumed without effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes completion events to `collaborator`.
    #[must_use]
    pub fn with_gamification(mut self, collaborator: Arc<dyn GamificationCollaborator>) -> Self {
        self.gamification = Some(collaborator);
        self
    }

    /// Routes creation events to `collaborator`.
    #[must_use]
    pub fn with_automation(mut self, collaborator: Arc<dyn AutomationCollaborator>) -> Self {
        self.automation = Some(collaborator);
        self
    }

    async fn deliver(&self, event: TaskEvent) {
        match event {
            TaskEvent::Created(task) => {
                let Some(automation) = &self.automation else {
                    return;
                };
                if let Err(err) = automation.notify_critical_task(&task).await {
                    warn!(task_id = %task.id(), error = %err, "automation notification failed");
                }
            }
            TaskEvent::Completed { task_id, user_id } => {
                let Some(gamification) = &self.gamification else {
                    return;
                };
                if let Err(err) = gamification.on_task_completed(task_id, user_id).await {
                    warn!(%task_id, error = %err, "gamification notification failed");
                }
            }
        }
    }
}

enum Command {
    Deliver(TaskEvent),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget [`TaskEventPublisher`] backed by a tokio worker.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<Command>,
}

impl NotificationDispatcher {
    /// Starts the delivery worker on the current tokio runtime.
    ///
    /// `capacity` bounds the number of queued events; zero is raised to one.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn spawn(collaborators: Collaborators, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_worker(collaborators, receiver));
        Self { sender }
    }

    /// Waits until every event published before this call has been handled.
    ///
    /// Returns `false` when the worker has stopped.
    pub async fn flush(&self) -> bool {
        let (ack, done) = oneshot::channel();
        if self.sender.send(Command::Flush(ack)).await.is_err() {
            return false;
        }
        done.await.is_ok()
    }
}

impl TaskEventPublisher for NotificationDispatcher {
    fn publish(&self, event: TaskEvent) {
        match self.sender.try_send(Command::Deliver(event)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("notification queue full; dropping task event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("notification worker stopped; dropping task event");
            }
        }
    }
}

async fn run_worker(collaborators: Collaborators, mut receiver: mpsc::Receiver<Command>) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Deliver(event) => collaborators.deliver(event).await,
            Command::Flush(ack) => {
                if ack.send(()).is_err() {
                    debug!("flush requester went away");
                }
            }
        }
    }
    debug!("notification worker exiting");
}
