//! Diesel row models for task persistence.

use super::schema::{task_blockers, task_comments, task_time_logs, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Work status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Record kind.
    pub kind: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Scheduled time.
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Meeting start.
    pub start_time: Option<DateTime<Utc>>,
    /// Meeting end.
    pub end_time: Option<DateTime<Utc>>,
    /// Estimated duration in minutes.
    pub duration_minutes: Option<i32>,
    /// Recurrence pattern.
    pub recurrence_pattern: Option<String>,
    /// Recurrence end boundary.
    pub recurrence_end: Option<NaiveDate>,
    /// Meeting location.
    pub location: Option<String>,
    /// Meeting link.
    pub meeting_url: Option<String>,
    /// Category association.
    pub category_id: Option<String>,
    /// Project association.
    pub project_id: Option<String>,
    /// Context association.
    pub context_id: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Owning user.
    pub owner: String,
    /// Assigned user.
    pub assigned_to: Option<String>,
    /// Claiming user.
    pub claimed_by: Option<String>,
    /// Claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Owning team.
    pub team_id: Option<String>,
    /// Blocked reason.
    pub blocked_reason: Option<String>,
    /// Archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Trash timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement model for task records.
///
/// `None` fields are written as `NULL` so cleared values persist.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Work status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Record kind.
    pub kind: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Scheduled time.
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Meeting start.
    pub start_time: Option<DateTime<Utc>>,
    /// Meeting end.
    pub end_time: Option<DateTime<Utc>>,
    /// Estimated duration in minutes.
    pub duration_minutes: Option<i32>,
    /// Recurrence pattern.
    pub recurrence_pattern: Option<String>,
    /// Recurrence end boundary.
    pub recurrence_end: Option<NaiveDate>,
    /// Meeting location.
    pub location: Option<String>,
    /// Meeting link.
    pub meeting_url: Option<String>,
    /// Category association.
    pub category_id: Option<String>,
    /// Project association.
    pub project_id: Option<String>,
    /// Context association.
    pub context_id: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Owning user.
    pub owner: String,
    /// Assigned user.
    pub assigned_to: Option<String>,
    /// Claiming user.
    pub claimed_by: Option<String>,
    /// Claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Owning team.
    pub team_id: Option<String>,
    /// Blocked reason.
    pub blocked_reason: Option<String>,
    /// Archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Trash timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Blocker edge row.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Insertable)]
#[diesel(table_name = task_blockers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlockerRow {
    /// Edge identifier.
    pub id: uuid::Uuid,
    /// Dependent task.
    pub task_id: uuid::Uuid,
    /// Blocking task.
    pub blocker_id: uuid::Uuid,
    /// User that recorded the edge.
    pub owner: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Comment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Commented task.
    pub task_id: uuid::Uuid,
    /// Author.
    pub author: String,
    /// Comment text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Single identifier column returned by locking reads.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct IdRow {
    /// Row identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
}

/// Time log row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_time_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimeLogRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Task the time was spent on.
    pub task_id: uuid::Uuid,
    /// User that logged the time.
    pub user_id: String,
    /// Minutes spent.
    pub minutes: i32,
    /// Logging timestamp.
    pub logged_at: DateTime<Utc>,
}
