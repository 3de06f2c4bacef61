//! Delivery of task events to mocked collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eyre::{Result, ensure};
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;
use tasklane::task::{
    adapters::{
        memory::InMemoryTaskStore,
        notifications::{Collaborators, NotificationDispatcher},
    },
    domain::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus, UserId},
    ports::{
        AutomationCollaborator, CollaboratorError, CollaboratorResult, GamificationCollaborator,
        TaskEvent, TaskEventPublisher,
    },
    services::TaskLifecycleService,
};

use super::helpers::actor;

mock! {
    pub Gamification {}

    #[async_trait]
    impl GamificationCollaborator for Gamification {
        async fn on_task_completed(&self, task_id: TaskId, user_id: UserId) -> CollaboratorResult<()>;
    }
}

mock! {
    pub Automation {}

    #[async_trait]
    impl AutomationCollaborator for Automation {
        async fn notify_critical_task(&self, task: &Task) -> CollaboratorResult<()>;
    }
}

type DispatchedService =
    TaskLifecycleService<InMemoryTaskStore, NotificationDispatcher, DefaultClock>;

fn service_with(collaborators: Collaborators) -> (DispatchedService, Arc<NotificationDispatcher>) {
    let dispatcher = Arc::new(NotificationDispatcher::spawn(collaborators, 16));
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::clone(&dispatcher),
        Arc::new(DefaultClock),
    );
    (service, dispatcher)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_reaches_automation() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let mut automation = MockAutomation::new();
    automation
        .expect_notify_critical_task()
        .withf(|task: &Task| task.title() == "Rotate keys")
        .times(1)
        .returning(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    let (service, dispatcher) =
        service_with(Collaborators::new().with_automation(Arc::new(automation)));

    service
        .create(&actor("alice"), TaskDraft::new("Rotate keys"))
        .await?;

    ensure!(dispatcher.flush().await, "dispatcher stopped");
    ensure!(calls.load(Ordering::SeqCst) == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_reaches_gamification_with_actor() -> Result<()> {
    let alice = actor("alice");
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let expected_user = alice.user_id().clone();
    let mut gamification = MockGamification::new();
    gamification
        .expect_on_task_completed()
        .withf(move |_, user_id: &UserId| *user_id == expected_user)
        .times(1)
        .returning(move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    let (service, dispatcher) =
        service_with(Collaborators::new().with_gamification(Arc::new(gamification)));

    let task = service.create(&alice, TaskDraft::new("Finish me")).await?;
    service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    ensure!(dispatcher.flush().await, "dispatcher stopped");
    ensure!(calls.load(Ordering::SeqCst) == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn collaborator_failure_never_fails_the_mutation() -> Result<()> {
    let mut gamification = MockGamification::new();
    gamification
        .expect_on_task_completed()
        .times(1)
        .returning(|_, _| {
            Err(CollaboratorError::new(
                "gamification",
                std::io::Error::other("points service down"),
            ))
        });
    let (service, dispatcher) =
        service_with(Collaborators::new().with_gamification(Arc::new(gamification)));
    let alice = actor("alice");

    let task = service.create(&alice, TaskDraft::new("Resilient")).await?;
    let done = service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    ensure!(done.status() == TaskStatus::Done);
    ensure!(dispatcher.flush().await, "worker must survive collaborator errors");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn events_without_collaborators_are_consumed() -> Result<()> {
    let dispatcher = NotificationDispatcher::spawn(Collaborators::new(), 0);
    dispatcher.publish(TaskEvent::Completed {
        task_id: TaskId::new(),
        user_id: UserId::new("alice")?,
    });

    ensure!(dispatcher.flush().await);
    Ok(())
}
