//! Task aggregate root and its lifecycle rules.

use super::{
    Recurrence, SoftState, StatusTransition, TaskDomainError, TaskId, TaskKind, TaskPriority,
    TaskStatus, TeamId, UserId, error::invalid_operation, recurrence::shift_to_date,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    kind: TaskKind,
    due_date: Option<NaiveDate>,
    scheduled_time: Option<DateTime<Utc>>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    duration_minutes: Option<u32>,
    recurrence: Option<Recurrence>,
    location: Option<String>,
    meeting_url: Option<String>,
    category_id: Option<String>,
    project_id: Option<String>,
    context_id: Option<String>,
    tags: Vec<String>,
    owner: UserId,
    assigned_to: Option<UserId>,
    claimed_by: Option<UserId>,
    claimed_at: Option<DateTime<Utc>>,
    team_id: Option<TeamId>,
    blocked_reason: Option<String>,
    archived_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted work status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted record kind.
    pub kind: TaskKind,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted scheduled time.
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Persisted meeting start.
    pub start_time: Option<DateTime<Utc>>,
    /// Persisted meeting end.
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted estimated duration in minutes.
    pub duration_minutes: Option<u32>,
    /// Persisted recurrence descriptor.
    pub recurrence: Option<Recurrence>,
    /// Persisted meeting location.
    pub location: Option<String>,
    /// Persisted meeting link.
    pub meeting_url: Option<String>,
    /// Persisted category association.
    pub category_id: Option<String>,
    /// Persisted project association.
    pub project_id: Option<String>,
    /// Persisted context association.
    pub context_id: Option<String>,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted owner.
    pub owner: UserId,
    /// Persisted assignee.
    pub assigned_to: Option<UserId>,
    /// Persisted claimer.
    pub claimed_by: Option<UserId>,
    /// Persisted claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Persisted owning team.
    pub team_id: Option<TeamId>,
    /// Persisted blocked reason.
    pub blocked_reason: Option<String>,
    /// Persisted archive timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted trash timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: TaskPriority,
    kind: TaskKind,
    due_date: Option<NaiveDate>,
    scheduled_time: Option<DateTime<Utc>>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    duration_minutes: Option<u32>,
    recurrence: Option<Recurrence>,
    location: Option<String>,
    meeting_url: Option<String>,
    category_id: Option<String>,
    project_id: Option<String>,
    context_id: Option<String>,
    tags: Vec<String>,
    owner: Option<UserId>,
    assigned_to: Option<UserId>,
    team_id: Option<TeamId>,
}

impl TaskDraft {
    /// Starts a draft with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the initial status (defaults to `todo`).
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the record as a meeting spanning `start` to `end`.
    #[must_use]
    pub const fn as_meeting(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.kind = TaskKind::Meeting;
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets the meeting location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the meeting link.
    #[must_use]
    pub fn with_meeting_url(mut self, url: impl Into<String>) -> Self {
        self.meeting_url = Some(url.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the scheduled time.
    #[must_use]
    pub const fn with_scheduled_time(mut self, scheduled_time: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(scheduled_time);
        self
    }

    /// Sets the estimated duration in minutes.
    #[must_use]
    pub const fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Makes the task recurring.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Links the task to a category.
    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Links the task to a project.
    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Links the task to a context.
    #[must_use]
    pub fn with_context(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Sets initial tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets an explicit owner instead of the acting user.
    #[must_use]
    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Assigns the task to a user.
    #[must_use]
    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Places the task in a team pool.
    #[must_use]
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }
}

/// Partial update applied to an existing task.
///
/// Outer `None` leaves a field untouched; for clearable fields an inner
/// `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    blocked_reason: Option<String>,
    priority: Option<TaskPriority>,
    due_date: Option<Option<NaiveDate>>,
    scheduled_time: Option<Option<DateTime<Utc>>>,
    duration_minutes: Option<Option<u32>>,
    recurrence: Option<Option<Recurrence>>,
    category_id: Option<Option<String>>,
    project_id: Option<Option<String>>,
    context_id: Option<Option<String>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Changes the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Records why the task is blocked. Only valid with `blocked` status.
    #[must_use]
    pub fn with_blocked_reason(mut self, reason: impl Into<String>) -> Self {
        self.blocked_reason = Some(reason.into());
        self
    }

    /// Changes the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces or clears the scheduled time.
    #[must_use]
    pub const fn with_scheduled_time(mut self, scheduled_time: Option<DateTime<Utc>>) -> Self {
        self.scheduled_time = Some(scheduled_time);
        self
    }

    /// Replaces or clears the duration.
    #[must_use]
    pub const fn with_duration_minutes(mut self, minutes: Option<u32>) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Replaces or clears the recurrence.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Replaces or clears the category association.
    #[must_use]
    pub fn with_category(mut self, category_id: Option<String>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Replaces or clears the project association.
    #[must_use]
    pub fn with_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Replaces or clears the context association.
    #[must_use]
    pub fn with_context(mut self, context_id: Option<String>) -> Self {
        self.context_id = Some(context_id);
        self
    }

    /// Returns the status this patch sets, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }
}

impl Task {
    /// Creates a new task from a draft.
    ///
    /// Status defaults to `todo` and the owner to `acting_user`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank and
    /// [`TaskDomainError::EmptyTag`] when a tag is blank.
    pub fn create(
        draft: TaskDraft,
        acting_user: &UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = normalize_title(&draft.title)?;
        let tags = normalize_tags(draft.tags)?;
        let status = draft.status.unwrap_or(TaskStatus::Todo);
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            title,
            description: draft.description,
            status,
            priority: draft.priority,
            kind: draft.kind,
            due_date: draft.due_date,
            scheduled_time: draft.scheduled_time,
            start_time: draft.start_time,
            end_time: draft.end_time,
            duration_minutes: draft.duration_minutes,
            recurrence: draft.recurrence,
            location: draft.location,
            meeting_url: draft.meeting_url,
            category_id: draft.category_id,
            project_id: draft.project_id,
            context_id: draft.context_id,
            tags,
            owner: draft.owner.unwrap_or_else(|| acting_user.clone()),
            assigned_to: draft.assigned_to,
            claimed_by: None,
            claimed_at: None,
            team_id: draft.team_id,
            blocked_reason: None,
            archived_at: None,
            deleted_at: None,
            completed_at: (status == TaskStatus::Done).then_some(timestamp),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            kind: data.kind,
            due_date: data.due_date,
            scheduled_time: data.scheduled_time,
            start_time: data.start_time,
            end_time: data.end_time,
            duration_minutes: data.duration_minutes,
            recurrence: data.recurrence,
            location: data.location,
            meeting_url: data.meeting_url,
            category_id: data.category_id,
            project_id: data.project_id,
            context_id: data.context_id,
            tags: data.tags,
            owner: data.owner,
            assigned_to: data.assigned_to,
            claimed_by: data.claimed_by,
            claimed_at: data.claimed_at,
            team_id: data.team_id,
            blocked_reason: data.blocked_reason,
            archived_at: data.archived_at,
            deleted_at: data.deleted_at,
            completed_at: data.completed_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the work status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the scheduled time, if any.
    #[must_use]
    pub const fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        self.scheduled_time
    }

    /// Returns the meeting start, if any.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns the meeting end, if any.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the estimated duration in minutes, if any.
    #[must_use]
    pub const fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Returns the recurrence descriptor, if any.
    #[must_use]
    pub const fn recurrence(&self) -> Option<&Recurrence> {
        self.recurrence.as_ref()
    }

    /// Returns the meeting location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the meeting link, if any.
    #[must_use]
    pub fn meeting_url(&self) -> Option<&str> {
        self.meeting_url.as_deref()
    }

    /// Returns the category association, if any.
    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    /// Returns the project association, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Returns the context association, if any.
    #[must_use]
    pub fn context_id(&self) -> Option<&str> {
        self.context_id.as_deref()
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    /// Returns the user that claimed the task from a pool, if any.
    #[must_use]
    pub const fn claimed_by(&self) -> Option<&UserId> {
        self.claimed_by.as_ref()
    }

    /// Returns when the task was claimed, if it was.
    #[must_use]
    pub const fn claimed_at(&self) -> Option<DateTime<Utc>> {
        self.claimed_at
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    /// Returns why the task is blocked, if recorded.
    #[must_use]
    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked_reason.as_deref()
    }

    /// Returns the archive timestamp, if any.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the trash timestamp, if any.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the derived soft-state.
    #[must_use]
    pub fn soft_state(&self) -> SoftState {
        SoftState::derive(self.archived_at, self.deleted_at)
    }

    /// Returns `true` when `user` owns, is assigned, or claimed the task.
    #[must_use]
    pub fn is_accessible_by(&self, user: &UserId) -> bool {
        self.owner == *user
            || self.assigned_to.as_ref() == Some(user)
            || self.claimed_by.as_ref() == Some(user)
    }

    /// Fails unless `user` may read or mutate the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::Unauthorized`] on an ownership mismatch.
    pub fn ensure_accessible_by(&self, user: &UserId) -> Result<(), TaskDomainError> {
        if self.is_accessible_by(user) {
            return Ok(());
        }
        Err(TaskDomainError::Unauthorized {
            task_id: self.id,
            user_id: user.clone(),
        })
    }

    /// Applies a partial update under the status rules.
    ///
    /// Entering `done` stamps `completed_at`; any other status clears it.
    /// Any status other than `blocked` clears `blocked_reason`. Returns the
    /// status transition when the patch carried a status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
    /// [`TaskDomainError::InvalidOperation`] when a blocked reason is supplied
    /// for a task that is not blocked.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<Option<StatusTransition>, TaskDomainError> {
        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let target_status = patch.status.unwrap_or(self.status);
        if patch.blocked_reason.is_some() && target_status != TaskStatus::Blocked {
            return Err(invalid_operation(
                self.id,
                "a blocked reason requires status blocked",
            ));
        }

        let timestamp = clock.utc();
        if let Some(new_title) = title {
            self.title = new_title;
        }
        assign_if_some(&mut self.description, patch.description);
        assign_if_some(&mut self.due_date, patch.due_date);
        assign_if_some(&mut self.scheduled_time, patch.scheduled_time);
        assign_if_some(&mut self.duration_minutes, patch.duration_minutes);
        assign_if_some(&mut self.recurrence, patch.recurrence);
        assign_if_some(&mut self.category_id, patch.category_id);
        assign_if_some(&mut self.project_id, patch.project_id);
        assign_if_some(&mut self.context_id, patch.context_id);
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(reason) = patch.blocked_reason {
            self.blocked_reason = Some(reason);
        }

        let transition = patch.status.map(|current| {
            let previous = self.status;
            self.status = current;
            if current != TaskStatus::Blocked {
                self.blocked_reason = None;
            }
            if current == TaskStatus::Done {
                if previous != TaskStatus::Done {
                    self.completed_at = Some(timestamp);
                }
            } else {
                self.completed_at = None;
            }
            StatusTransition { previous, current }
        });

        self.updated_at = timestamp;
        Ok(transition)
    }

    /// Moves the task to the archive.
    pub fn archive(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.archived_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Moves the task to the trash regardless of status or archive state.
    pub fn move_to_trash(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Returns the task to the active soft-state.
    pub fn restore(&mut self, clock: &impl Clock) {
        self.archived_at = None;
        self.deleted_at = None;
        self.updated_at = clock.utc();
    }

    /// Adds a tag, returning `false` when it was already present.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTag`] for a blank tag.
    pub fn add_tag(&mut self, tag: &str, clock: &impl Clock) -> Result<bool, TaskDomainError> {
        let normalized = normalize_tag(tag)?;
        if self.tags.contains(&normalized) {
            return Ok(false);
        }
        self.tags.push(normalized);
        self.updated_at = clock.utc();
        Ok(true)
    }

    /// Takes ownership of an unclaimed team pool task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAvailable`] unless the task belongs to a
    /// team, has no assignee, and is `unassigned`.
    pub fn claim(&mut self, user: &UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if !self.is_claimable() {
            return Err(TaskDomainError::NotAvailable(self.id));
        }
        let timestamp = clock.utc();
        self.assigned_to = Some(user.clone());
        self.owner = user.clone();
        self.claimed_by = Some(user.clone());
        self.claimed_at = Some(timestamp);
        self.status = TaskStatus::Todo;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Returns `true` when the task is an unclaimed pool task.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.team_id.is_some() && self.assigned_to.is_none() && self.status == TaskStatus::Unassigned
    }

    /// Hands a claimed team task back to its pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidOperation`] when the task has no team
    /// and [`TaskDomainError::Unauthorized`] when `user` is not the assignee.
    pub fn release(&mut self, user: &UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.team_id.is_none() {
            return Err(invalid_operation(self.id, "only team tasks can be released"));
        }
        if self.assigned_to.as_ref() != Some(user) {
            return Err(TaskDomainError::Unauthorized {
                task_id: self.id,
                user_id: user.clone(),
            });
        }
        self.assigned_to = None;
        self.claimed_by = None;
        self.claimed_at = None;
        self.status = TaskStatus::Unassigned;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Builds the successor record for a completed recurring task.
    ///
    /// The reference date is the due date, falling back to the date of the
    /// scheduled time. Returns `None` when the task does not recur, has no
    /// reference date, or the next occurrence lies past the end boundary.
    /// Meeting start moves onto the next date and the end keeps the
    /// original meeting length, so meetings spanning midnight stay ordered.
    #[must_use]
    pub fn recurrence_successor(&self, clock: &impl Clock) -> Option<Self> {
        let recurrence = self.recurrence?;
        let reference = self
            .due_date
            .or_else(|| self.scheduled_time.map(|time| time.date_naive()))?;
        let next = recurrence.next_occurrence(reference)?;
        let start_time = self.start_time.map(|time| shift_to_date(time, next));
        let end_time = match (self.start_time, self.end_time, start_time) {
            (Some(start), Some(end), Some(shifted)) => {
                Some(shifted.checked_add_signed(end.signed_duration_since(start))?)
            }
            (_, end, _) => end.map(|time| shift_to_date(time, next)),
        };
        let timestamp = clock.utc();

        Some(Self {
            id: TaskId::new(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: TaskStatus::Todo,
            priority: self.priority,
            kind: self.kind,
            due_date: Some(next),
            scheduled_time: self.scheduled_time.map(|time| shift_to_date(time, next)),
            start_time,
            end_time,
            duration_minutes: self.duration_minutes,
            recurrence: Some(recurrence),
            location: self.location.clone(),
            meeting_url: self.meeting_url.clone(),
            category_id: self.category_id.clone(),
            project_id: self.project_id.clone(),
            context_id: self.context_id.clone(),
            tags: Vec::new(),
            owner: self.owner.clone(),
            assigned_to: None,
            claimed_by: None,
            claimed_at: None,
            team_id: None,
            blocked_reason: None,
            archived_at: None,
            deleted_at: None,
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }
}

fn assign_if_some<T>(field: &mut Option<T>, update: Option<Option<T>>) {
    if let Some(value) = update {
        *field = value;
    }
}

fn normalize_title(title: &str) -> Result<String, TaskDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn normalize_tag(tag: &str) -> Result<String, TaskDomainError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTag);
    }
    Ok(trimmed.to_owned())
}

fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, TaskDomainError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let value = normalize_tag(&tag)?;
        if !normalized.contains(&value) {
            normalized.push(value);
        }
    }
    Ok(normalized)
}
