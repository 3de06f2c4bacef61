//! Conversions between domain values and Diesel rows.

use super::models::{BlockerRow, CommentRow, NewTaskRow, TaskRow, TimeLogRow};
use crate::task::{
    domain::{
        BlockerEdge, EdgeId, PersistedTaskData, Recurrence, RecurrencePattern, Task, TaskComment,
        TaskId, TaskKind, TaskPriority, TaskStatus, TeamId, TimeLog, UserId,
    },
    ports::{TaskRepositoryError, TaskRepositoryResult},
};

pub(super) fn task_to_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let duration_minutes = task
        .duration_minutes()
        .map(i32::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        kind: task.kind().as_str().to_owned(),
        due_date: task.due_date(),
        scheduled_time: task.scheduled_time(),
        start_time: task.start_time(),
        end_time: task.end_time(),
        duration_minutes,
        recurrence_pattern: task
            .recurrence()
            .map(|recurrence| recurrence.pattern().as_str().to_owned()),
        recurrence_end: task.recurrence().and_then(Recurrence::end),
        location: task.location().map(str::to_owned),
        meeting_url: task.meeting_url().map(str::to_owned),
        category_id: task.category_id().map(str::to_owned),
        project_id: task.project_id().map(str::to_owned),
        context_id: task.context_id().map(str::to_owned),
        tags: task.tags().to_vec(),
        owner: task.owner().as_str().to_owned(),
        assigned_to: task.assigned_to().map(|user| user.as_str().to_owned()),
        claimed_by: task.claimed_by().map(|user| user.as_str().to_owned()),
        claimed_at: task.claimed_at(),
        team_id: task.team_id().map(|team| team.as_str().to_owned()),
        blocked_reason: task.blocked_reason().map(str::to_owned),
        archived_at: task.archived_at(),
        deleted_at: task.deleted_at(),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub(super) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let recurrence = row
        .recurrence_pattern
        .as_deref()
        .map(RecurrencePattern::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?
        .map(|pattern| Recurrence::from_parts(pattern, row.recurrence_end));

    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        status: TaskStatus::try_from(row.status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        priority: TaskPriority::try_from(row.priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        kind: TaskKind::try_from(row.kind.as_str()).map_err(TaskRepositoryError::persistence)?,
        due_date: row.due_date,
        scheduled_time: row.scheduled_time,
        start_time: row.start_time,
        end_time: row.end_time,
        duration_minutes: row
            .duration_minutes
            .map(u32::try_from)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        recurrence,
        location: row.location,
        meeting_url: row.meeting_url,
        category_id: row.category_id,
        project_id: row.project_id,
        context_id: row.context_id,
        tags: row.tags,
        owner: user_id(row.owner)?,
        assigned_to: row.assigned_to.map(user_id).transpose()?,
        claimed_by: row.claimed_by.map(user_id).transpose()?,
        claimed_at: row.claimed_at,
        team_id: row
            .team_id
            .map(TeamId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        blocked_reason: row.blocked_reason,
        archived_at: row.archived_at,
        deleted_at: row.deleted_at,
        completed_at: row.completed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Task::from_persisted(data))
}

pub(super) fn edge_to_row(edge: &BlockerEdge) -> BlockerRow {
    BlockerRow {
        id: edge.id().into_inner(),
        task_id: edge.task_id().into_inner(),
        blocker_id: edge.blocker_id().into_inner(),
        owner: edge.owner().as_str().to_owned(),
        created_at: edge.created_at(),
    }
}

pub(super) fn row_to_edge(row: BlockerRow) -> TaskRepositoryResult<BlockerEdge> {
    Ok(BlockerEdge::from_persisted(
        EdgeId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        TaskId::from_uuid(row.blocker_id),
        user_id(row.owner)?,
        row.created_at,
    ))
}

pub(super) fn comment_to_row(comment: &TaskComment) -> CommentRow {
    CommentRow {
        id: comment.id(),
        task_id: comment.task_id().into_inner(),
        author: comment.author().as_str().to_owned(),
        body: comment.body().to_owned(),
        created_at: comment.created_at(),
    }
}

pub(super) fn row_to_comment(row: CommentRow) -> TaskRepositoryResult<TaskComment> {
    Ok(TaskComment::from_persisted(
        row.id,
        TaskId::from_uuid(row.task_id),
        user_id(row.author)?,
        row.body,
        row.created_at,
    ))
}

pub(super) fn time_log_to_row(log: &TimeLog) -> TaskRepositoryResult<TimeLogRow> {
    Ok(TimeLogRow {
        id: log.id(),
        task_id: log.task_id().into_inner(),
        user_id: log.user_id().as_str().to_owned(),
        minutes: i32::try_from(log.minutes()).map_err(TaskRepositoryError::persistence)?,
        logged_at: log.logged_at(),
    })
}

pub(super) fn row_to_time_log(row: TimeLogRow) -> TaskRepositoryResult<TimeLog> {
    Ok(TimeLog::from_persisted(
        row.id,
        TaskId::from_uuid(row.task_id),
        user_id(row.user_id)?,
        u32::try_from(row.minutes).map_err(TaskRepositoryError::persistence)?,
        row.logged_at,
    ))
}

fn user_id(raw: String) -> TaskRepositoryResult<UserId> {
    UserId::new(raw).map_err(TaskRepositoryError::persistence)
}
