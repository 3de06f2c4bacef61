//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, as_user, owner, run_async};
use rstest_bdd_macros::when;
use tasklane::task::domain::{TaskPatch, TaskStatus};

#[when(r#"the task "{title}" is marked done"#)]
fn mark_done(world: &mut LifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let alice = owner()?;
    let patch = TaskPatch::new().with_status(TaskStatus::Done);
    let result = run_async(world.service.update(&alice, id, patch));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the task "{title}" is moved to the trash"#)]
fn move_to_trash(world: &mut LifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let alice = owner()?;
    let result = run_async(world.service.move_to_trash(&alice, id));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#"the task "{title}" is archived"#)]
fn archive(world: &mut LifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let alice = owner()?;
    let result = run_async(world.service.archive(&alice, id));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{task}" is blocked by "{blocker}""#)]
fn block(world: &mut LifecycleWorld, task: String, blocker: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&task)?;
    let blocker_id = world.task_id(&blocker)?;
    let alice = owner()?;
    let result = run_async(world.graph.add_blocker(&alice, task_id, blocker_id));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{user}" claims the task "{title}""#)]
fn claim(world: &mut LifecycleWorld, user: String, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let claimer = as_user(&user)?;
    let result = run_async(world.service.claim(&claimer, id));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{user}" releases the task "{title}""#)]
fn release(world: &mut LifecycleWorld, user: String, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let releaser = as_user(&user)?;
    let result = run_async(world.service.release(&releaser, id, None));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}
