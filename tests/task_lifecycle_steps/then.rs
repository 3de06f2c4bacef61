//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, owner, run_async};
use chrono::NaiveDate;
use rstest_bdd_macros::then;
use tasklane::task::{
    domain::{TaskStatus, TeamId},
    query::TaskView,
    services::TaskErrorKind,
};

fn expected_kind(description: &str) -> Result<TaskErrorKind, eyre::Report> {
    match description {
        "invalid dependency" => Ok(TaskErrorKind::InvalidDependency),
        "not available" => Ok(TaskErrorKind::NotAvailable),
        "unauthorized" => Ok(TaskErrorKind::Unauthorized),
        "not found" => Ok(TaskErrorKind::NotFound),
        other => Err(eyre::eyre!("unknown error description {other:?}")),
    }
}

fn parse_view(raw: &str) -> Result<TaskView, eyre::Report> {
    match raw {
        "active" => Ok(TaskView::Active),
        "archived" => Ok(TaskView::Archived),
        "trash" => Ok(TaskView::Trash),
        "all" => Ok(TaskView::All),
        other => Err(eyre::eyre!("unknown view {other:?}")),
    }
}

fn view_titles(world: &LifecycleWorld, view: &str) -> Result<Vec<String>, eyre::Report> {
    let alice = owner()?;
    let tasks = run_async(world.service.list(&alice, parse_view(view)?, Vec::new()))?;
    Ok(tasks.iter().map(|task| task.title().to_owned()).collect())
}

#[then(r#"the last operation fails with "{description}""#)]
fn last_operation_fails(world: &LifecycleWorld, description: String) -> Result<(), eyre::Report> {
    let expected = expected_kind(&description)?;
    match &world.last_outcome {
        Some(Err(err)) if err.kind() == expected => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected {expected:?}, got {err}")),
        Some(Ok(())) => Err(eyre::eyre!("expected {expected:?}, but the operation succeeded")),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then("the last operation succeeds")]
fn last_operation_succeeds(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    match &world.last_outcome {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("operation failed: {err}")),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then(r#"an open task "{title}" is due on "{due}""#)]
fn open_task_due_on(world: &LifecycleWorld, title: String, due: String) -> Result<(), eyre::Report> {
    let expected = NaiveDate::parse_from_str(&due, "%Y-%m-%d")?;
    let alice = owner()?;
    let tasks = run_async(world.service.list(&alice, TaskView::Active, Vec::new()))?;
    let found = tasks.iter().any(|task| {
        task.title() == title
            && task.status() == TaskStatus::Todo
            && task.due_date() == Some(expected)
    });
    eyre::ensure!(found, "no open task {title:?} due on {due}");
    Ok(())
}

#[then("there are {count:usize} tasks in total")]
fn tasks_in_total(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let total = view_titles(world, "all")?.len();
    eyre::ensure!(total == count, "expected {count} tasks, found {total}");
    Ok(())
}

#[then(r#""{task}" lists "{blocker}" as a blocker"#)]
fn lists_blocker(world: &LifecycleWorld, task: String, blocker: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&task)?;
    let blocker_id = world.task_id(&blocker)?;
    let alice = owner()?;
    let blockers = run_async(world.graph.get_blockers(&alice, task_id))?;
    eyre::ensure!(
        blockers.iter().any(|dependency| dependency.task.id() == blocker_id),
        "{blocker:?} is not a blocker of {task:?}"
    );
    Ok(())
}

#[then(r#"the "{view}" view contains "{title}""#)]
fn view_contains(world: &LifecycleWorld, view: String, title: String) -> Result<(), eyre::Report> {
    let titles = view_titles(world, &view)?;
    eyre::ensure!(titles.contains(&title), "{view} view lacks {title:?}: {titles:?}");
    Ok(())
}

#[then(r#"the "{view}" view does not contain "{title}""#)]
fn view_excludes(world: &LifecycleWorld, view: String, title: String) -> Result<(), eyre::Report> {
    let titles = view_titles(world, &view)?;
    eyre::ensure!(!titles.contains(&title), "{view} view unexpectedly holds {title:?}");
    Ok(())
}

#[then(r#"the pool of team "{team}" contains "{title}""#)]
fn pool_contains(world: &LifecycleWorld, team: String, title: String) -> Result<(), eyre::Report> {
    let alice = owner()?;
    let pool = run_async(world.service.list_team_pool(&alice, &TeamId::new(team)?))?;
    eyre::ensure!(
        pool.iter().any(|task| task.title() == title),
        "{title:?} is not in the pool"
    );
    Ok(())
}
