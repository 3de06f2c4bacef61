//! End-to-end lifecycle flows over the in-memory adapters.

use super::helpers::{Engine, actor, engine};
use chrono::NaiveDate;
use eyre::{Result, ensure};
use rstest::rstest;
use tasklane::task::{
    domain::{ActingIdentity, Recurrence, RecurrencePattern, TaskDraft, TaskPatch, TaskStatus},
    ports::{TaskEvent, TaskRepository},
    query::TaskView,
    services::TaskErrorKind,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_task_completion_spawns_one_successor(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let due = NaiveDate::from_ymd_opt(2024, 3, 4).ok_or_else(|| eyre::eyre!("bad date"))?;
    let task = engine
        .service
        .create(
            &alice,
            TaskDraft::new("Water plants")
                .with_due_date(due)
                .with_recurrence(Recurrence::new(RecurrencePattern::Weekly)),
        )
        .await?;

    engine
        .service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    let active = engine
        .service
        .list(&alice, TaskView::Active, Vec::new())
        .await?;
    let open: Vec<_> = active
        .iter()
        .filter(|candidate| candidate.status() == TaskStatus::Todo)
        .collect();
    ensure!(open.len() == 1, "expected exactly one open successor");
    let successor = open.first().ok_or_else(|| eyre::eyre!("missing successor"))?;
    ensure!(successor.due_date() == NaiveDate::from_ymd_opt(2024, 3, 11));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn monthly_task_rolls_over_month_end(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let due = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or_else(|| eyre::eyre!("bad date"))?;
    let task = engine
        .service
        .create(
            &alice,
            TaskDraft::new("Pay rent")
                .with_due_date(due)
                .with_recurrence(Recurrence::new(RecurrencePattern::Monthly)),
        )
        .await?;

    engine
        .service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    let due_dates: Vec<_> = engine
        .service
        .list(&alice, TaskView::Active, Vec::new())
        .await?
        .iter()
        .filter(|candidate| candidate.id() != task.id())
        .filter_map(tasklane::task::domain::Task::due_date)
        .collect();
    ensure!(due_dates == NaiveDate::from_ymd_opt(2024, 2, 29).into_iter().collect::<Vec<_>>());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recurrence_end_stops_the_series(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let due = NaiveDate::from_ymd_opt(2024, 5, 1).ok_or_else(|| eyre::eyre!("bad date"))?;
    let recurrence = Recurrence::new(RecurrencePattern::Weekly).until(due);
    let task = engine
        .service
        .create(
            &alice,
            TaskDraft::new("Final check")
                .with_due_date(due)
                .with_recurrence(recurrence),
        )
        .await?;

    engine
        .service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    let all = engine.service.list(&alice, TaskView::All, Vec::new()).await?;
    ensure!(all.len() == 1, "no successor past the end boundary");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn events_are_recorded_in_order(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let task = engine
        .service
        .create(&alice, TaskDraft::new("Observe me"))
        .await?;
    engine
        .service
        .update(&alice, task.id(), TaskPatch::new().with_status(TaskStatus::Done))
        .await?;

    let events = engine.events.events();
    ensure!(events.len() == 2);
    ensure!(matches!(events.first(), Some(TaskEvent::Created(created)) if created.id() == task.id()));
    ensure!(matches!(
        events.get(1),
        Some(TaskEvent::Completed { task_id, user_id })
            if *task_id == task.id() && user_id == alice.user_id()
    ));
    Ok(())
}

#[rstest]
fn unauthenticated_session_is_rejected_before_any_work() {
    let err = ActingIdentity::authenticated(None).expect_err("no session user");
    assert!(matches!(
        err,
        tasklane::task::domain::TaskDomainError::AuthenticationRequired
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_blocked_task_removes_its_edges(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let first = engine.service.create(&alice, TaskDraft::new("First")).await?;
    let second = engine.service.create(&alice, TaskDraft::new("Second")).await?;
    engine.graph.add_blocker(&alice, second.id(), first.id()).await?;

    engine.service.permanent_delete(&alice, second.id()).await?;

    ensure!(engine.store.find_by_id(second.id()).await?.is_none());
    ensure!(engine.graph.get_blocked_tasks(&alice, first.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trashing_does_not_depend_on_status(engine: Engine) -> Result<()> {
    let alice = actor("alice");
    let task = engine
        .service
        .create(
            &alice,
            TaskDraft::new("Stuck").with_status(TaskStatus::Blocked),
        )
        .await?;

    engine.service.move_to_trash(&alice, task.id()).await?;
    let trash = engine.service.list(&alice, TaskView::Trash, Vec::new()).await?;
    ensure!(trash.iter().any(|candidate| candidate.id() == task.id()));

    let err = engine
        .service
        .update(
            &actor("mallory"),
            task.id(),
            TaskPatch::new().with_status(TaskStatus::Done),
        )
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("stranger update must fail"))?;
    ensure!(err.kind() == TaskErrorKind::Unauthorized);
    Ok(())
}
