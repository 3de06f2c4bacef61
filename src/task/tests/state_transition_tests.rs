//! Unit tests for status rules, soft-state derivation, and pool claiming.

use super::support::{FixedClock, user};
use crate::task::domain::{
    SoftState, StatusTransition, Task, TaskDomainError, TaskDraft, TaskPatch, TaskStatus, TeamId,
};
use chrono::{Duration, TimeZone, Utc};
use eyre::{Result, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::default()
}

#[fixture]
fn task(clock: FixedClock) -> Task {
    Task::create(TaskDraft::new("State machine"), &user("alice"), &clock).expect("task creation")
}

fn pool_task(clock: &FixedClock) -> Task {
    let draft = TaskDraft::new("Pool work")
        .with_status(TaskStatus::Unassigned)
        .with_team(TeamId::new("platform").expect("team id"));
    Task::create(draft, &user("lead"), clock).expect("task creation")
}

#[rstest]
#[case(None, None, SoftState::Active)]
#[case(Some(1), None, SoftState::Archived)]
#[case(None, Some(1), SoftState::Trashed)]
#[case(Some(1), Some(2), SoftState::Trashed)]
#[case(Some(2), Some(1), SoftState::Trashed)]
fn soft_state_prefers_trash(
    #[case] archived_day: Option<u32>,
    #[case] deleted_day: Option<u32>,
    #[case] expected: SoftState,
) {
    let at = |day: u32| {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0)
            .single()
            .expect("valid instant")
    };
    assert_eq!(
        SoftState::derive(archived_day.map(at), deleted_day.map(at)),
        expected
    );
}

#[rstest]
fn trash_then_archive_stays_trashed(clock: FixedClock, mut task: Task) {
    task.move_to_trash(&clock);
    clock.advance(Duration::minutes(5));
    task.archive(&clock);

    assert!(task.deleted_at().is_some());
    assert!(task.archived_at().is_some());
    assert_eq!(task.soft_state(), SoftState::Trashed);
}

#[rstest]
fn restore_clears_both_timestamps(clock: FixedClock, mut task: Task) {
    task.archive(&clock);
    task.move_to_trash(&clock);
    task.restore(&clock);

    assert_eq!(task.soft_state(), SoftState::Active);
    assert!(task.archived_at().is_none());
    assert!(task.deleted_at().is_none());
}

#[rstest]
fn entering_done_stamps_completion(clock: FixedClock, mut task: Task) -> Result<()> {
    clock.advance(Duration::hours(1));
    let transition = task.apply_patch(TaskPatch::new().with_status(TaskStatus::Done), &clock)?;

    ensure!(
        transition
            == Some(StatusTransition {
                previous: TaskStatus::Todo,
                current: TaskStatus::Done,
            }),
        "unexpected transition {transition:?}"
    );
    ensure!(transition.is_some_and(StatusTransition::entered_done));
    ensure!(task.completed_at() == Some(task.updated_at()));
    Ok(())
}

#[rstest]
fn repeating_done_keeps_original_completion(clock: FixedClock, mut task: Task) -> Result<()> {
    task.apply_patch(TaskPatch::new().with_status(TaskStatus::Done), &clock)?;
    let first_completion = task.completed_at();
    clock.advance(Duration::hours(2));
    let transition = task.apply_patch(TaskPatch::new().with_status(TaskStatus::Done), &clock)?;

    ensure!(!transition.is_some_and(StatusTransition::entered_done));
    ensure!(task.completed_at() == first_completion);
    Ok(())
}

#[rstest]
#[case(TaskStatus::Todo)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Cancelled)]
fn leaving_done_clears_completion(
    clock: FixedClock,
    mut task: Task,
    #[case] next: TaskStatus,
) -> Result<()> {
    task.apply_patch(TaskPatch::new().with_status(TaskStatus::Done), &clock)?;
    task.apply_patch(TaskPatch::new().with_status(next), &clock)?;

    ensure!(task.completed_at().is_none());
    ensure!(task.status() == next);
    Ok(())
}

#[rstest]
fn blocked_reason_is_kept_while_blocked(clock: FixedClock, mut task: Task) -> Result<()> {
    let patch = TaskPatch::new()
        .with_status(TaskStatus::Blocked)
        .with_blocked_reason("waiting on vendor");
    task.apply_patch(patch, &clock)?;
    ensure!(task.blocked_reason() == Some("waiting on vendor"));

    task.apply_patch(TaskPatch::new().with_title("Renamed"), &clock)?;
    ensure!(task.blocked_reason() == Some("waiting on vendor"));

    task.apply_patch(TaskPatch::new().with_status(TaskStatus::InProgress), &clock)?;
    ensure!(task.blocked_reason().is_none());
    Ok(())
}

#[rstest]
fn blocked_reason_without_blocked_status_is_rejected(clock: FixedClock, mut task: Task) {
    let before = task.clone();
    let result = task.apply_patch(TaskPatch::new().with_blocked_reason("nope"), &clock);

    assert!(matches!(
        result,
        Err(TaskDomainError::InvalidOperation { .. })
    ));
    assert_eq!(task, before);
}

#[rstest]
fn patch_clears_optional_fields(clock: FixedClock) -> Result<()> {
    let due = chrono::NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
    let draft = TaskDraft::new("Clearable")
        .with_due_date(due)
        .with_description("details");
    let mut task = Task::create(draft, &user("alice"), &clock)?;
    task.apply_patch(
        TaskPatch::new().with_due_date(None).with_description(None),
        &clock,
    )?;

    ensure!(task.due_date().is_none());
    ensure!(task.description().is_none());
    Ok(())
}

#[rstest]
fn claim_takes_ownership_of_pool_task(clock: FixedClock) -> Result<()> {
    let mut task = pool_task(&clock);
    ensure!(task.is_claimable());
    task.claim(&user("dana"), &clock)?;

    ensure!(task.status() == TaskStatus::Todo);
    ensure!(task.assigned_to() == Some(&user("dana")));
    ensure!(task.claimed_by() == Some(&user("dana")));
    ensure!(task.owner() == &user("dana"));
    ensure!(task.claimed_at() == Some(clock_now(&clock)));
    Ok(())
}

fn clock_now(clock: &FixedClock) -> chrono::DateTime<Utc> {
    mockable::Clock::utc(clock)
}

#[rstest]
fn claim_requires_unassigned_status(clock: FixedClock) {
    let mut task = pool_task(&clock);
    task.apply_patch(TaskPatch::new().with_status(TaskStatus::Todo), &clock)
        .expect("status change");

    assert_eq!(
        task.claim(&user("dana"), &clock),
        Err(TaskDomainError::NotAvailable(task.id()))
    );
}

#[rstest]
fn claim_requires_a_team(clock: FixedClock) {
    let draft = TaskDraft::new("Solo").with_status(TaskStatus::Unassigned);
    let mut task = Task::create(draft, &user("lead"), &clock).expect("task creation");

    assert_eq!(
        task.claim(&user("dana"), &clock),
        Err(TaskDomainError::NotAvailable(task.id()))
    );
}

#[rstest]
fn claim_requires_no_assignee(clock: FixedClock) {
    let mut task = pool_task(&clock);
    task.claim(&user("dana"), &clock).expect("first claim");

    assert_eq!(
        task.claim(&user("erin"), &clock),
        Err(TaskDomainError::NotAvailable(task.id()))
    );
}

#[rstest]
fn release_returns_task_to_pool(clock: FixedClock) -> Result<()> {
    let mut task = pool_task(&clock);
    task.claim(&user("dana"), &clock)?;
    task.release(&user("dana"), &clock)?;

    ensure!(task.status() == TaskStatus::Unassigned);
    ensure!(task.assigned_to().is_none());
    ensure!(task.claimed_by().is_none());
    ensure!(task.claimed_at().is_none());
    ensure!(task.is_claimable());
    Ok(())
}

#[rstest]
fn release_by_non_assignee_is_unauthorized(clock: FixedClock) {
    let mut task = pool_task(&clock);
    task.claim(&user("dana"), &clock).expect("claim");

    assert_eq!(
        task.release(&user("erin"), &clock),
        Err(TaskDomainError::Unauthorized {
            task_id: task.id(),
            user_id: user("erin"),
        })
    );
}

#[rstest]
fn release_without_team_is_invalid(clock: FixedClock, mut task: Task) {
    assert!(matches!(
        task.release(&user("alice"), &clock),
        Err(TaskDomainError::InvalidOperation { .. })
    ));
}
