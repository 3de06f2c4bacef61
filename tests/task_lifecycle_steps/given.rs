//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, as_user, owner, run_async};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklane::task::domain::{
    Recurrence, RecurrencePattern, TaskDraft, TaskStatus, TeamId,
};

fn parse_date(raw: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").wrap_err_with(|| format!("invalid date {raw:?}"))
}

fn parse_pattern(raw: &str) -> Result<RecurrencePattern, eyre::Report> {
    RecurrencePattern::try_from(raw).map_err(|err| eyre::eyre!("{err}"))
}

fn create(world: &mut LifecycleWorld, draft: TaskDraft) -> Result<(), eyre::Report> {
    let alice = owner()?;
    let task = run_async(world.service.create(&alice, draft)).wrap_err("create scenario task")?;
    world.tasks.insert(task.title().to_owned(), task.id());
    Ok(())
}

#[given(r#"a plain task "{title}""#)]
fn plain_task(world: &mut LifecycleWorld, title: String) -> Result<(), eyre::Report> {
    create(world, TaskDraft::new(title))
}

#[given(r#"a recurring task "{title}" repeating "{pattern}" from "{due}""#)]
fn recurring_task(
    world: &mut LifecycleWorld,
    title: String,
    pattern: String,
    due: String,
) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(title)
        .with_due_date(parse_date(&due)?)
        .with_recurrence(Recurrence::new(parse_pattern(&pattern)?));
    create(world, draft)
}

#[given(r#"a bounded recurring task "{title}" repeating "{pattern}" from "{due}" until "{end}""#)]
fn bounded_recurring_task(
    world: &mut LifecycleWorld,
    title: String,
    pattern: String,
    due: String,
    end: String,
) -> Result<(), eyre::Report> {
    let recurrence = Recurrence::new(parse_pattern(&pattern)?).until(parse_date(&end)?);
    let draft = TaskDraft::new(title)
        .with_due_date(parse_date(&due)?)
        .with_recurrence(recurrence);
    create(world, draft)
}

#[given(r#"a pool task "{title}" for team "{team}""#)]
fn pool_task(world: &mut LifecycleWorld, title: String, team: String) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(title)
        .with_status(TaskStatus::Unassigned)
        .with_team(TeamId::new(team)?);
    create(world, draft)
}

#[given(r#""{user}" has claimed the task "{title}""#)]
fn has_claimed(world: &mut LifecycleWorld, user: String, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let claimer = as_user(&user)?;
    run_async(world.service.claim(&claimer, id)).wrap_err("claim in scenario setup")?;
    Ok(())
}
