//! Field catalogues for the task and blocker collections.

use super::{FieldName, FilterValue};
use crate::task::domain::{BlockerEdge, Task};

/// Filterable and sortable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// Record identifier.
    Id,
    /// Title.
    Title,
    /// Description.
    Description,
    /// Work status.
    Status,
    /// Priority.
    Priority,
    /// Record kind.
    Kind,
    /// Due date.
    DueDate,
    /// Scheduled time.
    ScheduledTime,
    /// Recurrence pattern.
    Recurrence,
    /// Owner.
    Owner,
    /// Assignee.
    AssignedTo,
    /// Claimer.
    ClaimedBy,
    /// Claim timestamp.
    ClaimedAt,
    /// Owning team.
    TeamId,
    /// Blocked reason.
    BlockedReason,
    /// Category association.
    CategoryId,
    /// Project association.
    ProjectId,
    /// Context association.
    ContextId,
    /// Tags (multi-valued).
    Tags,
    /// Archive timestamp.
    ArchivedAt,
    /// Trash timestamp.
    DeletedAt,
    /// Completion timestamp.
    CompletedAt,
    /// Creation timestamp.
    CreatedAt,
    /// Modification timestamp.
    UpdatedAt,
}

impl FieldName for TaskField {
    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Kind => "kind",
            Self::DueDate => "due_date",
            Self::ScheduledTime => "scheduled_time",
            Self::Recurrence => "recurrence",
            Self::Owner => "owner",
            Self::AssignedTo => "assigned_to",
            Self::ClaimedBy => "claimed_by",
            Self::ClaimedAt => "claimed_at",
            Self::TeamId => "team_id",
            Self::BlockedReason => "blocked_reason",
            Self::CategoryId => "category_id",
            Self::ProjectId => "project_id",
            Self::ContextId => "context_id",
            Self::Tags => "tags",
            Self::ArchivedAt => "archived_at",
            Self::DeletedAt => "deleted_at",
            Self::CompletedAt => "completed_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Filterable blocker edge fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockerField {
    /// Edge identifier.
    Id,
    /// Dependent task.
    TaskId,
    /// Blocking task.
    BlockerId,
    /// User that recorded the edge.
    Owner,
    /// Creation timestamp.
    CreatedAt,
}

impl FieldName for BlockerField {
    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::TaskId => "task_id",
            Self::BlockerId => "blocker_id",
            Self::Owner => "owner",
            Self::CreatedAt => "created_at",
        }
    }
}

/// A record whose fields can be read by predicate evaluation.
pub trait Filterable {
    /// Field catalogue for this record type.
    type Field: FieldName;

    /// Returns every value stored under `field`; empty when unset.
    fn field_values(&self, field: Self::Field) -> Vec<FilterValue>;
}

fn text(value: Option<&str>) -> Vec<FilterValue> {
    value
        .map(|inner| FilterValue::Text(inner.to_owned()))
        .into_iter()
        .collect()
}

fn single(value: Option<FilterValue>) -> Vec<FilterValue> {
    value.into_iter().collect()
}

impl Filterable for Task {
    type Field = TaskField;

    fn field_values(&self, field: TaskField) -> Vec<FilterValue> {
        match field {
            TaskField::Id => vec![self.id().into()],
            TaskField::Title => text(Some(self.title())),
            TaskField::Description => text(self.description()),
            TaskField::Status => vec![self.status().into()],
            TaskField::Priority => vec![self.priority().into()],
            TaskField::Kind => vec![self.kind().into()],
            TaskField::DueDate => single(self.due_date().map(FilterValue::Date)),
            TaskField::ScheduledTime => single(self.scheduled_time().map(FilterValue::Timestamp)),
            TaskField::Recurrence => text(self.recurrence().map(|r| r.pattern().as_str())),
            TaskField::Owner => vec![self.owner().into()],
            TaskField::AssignedTo => single(self.assigned_to().map(FilterValue::from)),
            TaskField::ClaimedBy => single(self.claimed_by().map(FilterValue::from)),
            TaskField::ClaimedAt => single(self.claimed_at().map(FilterValue::Timestamp)),
            TaskField::TeamId => single(self.team_id().map(FilterValue::from)),
            TaskField::BlockedReason => text(self.blocked_reason()),
            TaskField::CategoryId => text(self.category_id()),
            TaskField::ProjectId => text(self.project_id()),
            TaskField::ContextId => text(self.context_id()),
            TaskField::Tags => self
                .tags()
                .iter()
                .map(|tag| FilterValue::Text(tag.clone()))
                .collect(),
            TaskField::ArchivedAt => single(self.archived_at().map(FilterValue::Timestamp)),
            TaskField::DeletedAt => single(self.deleted_at().map(FilterValue::Timestamp)),
            TaskField::CompletedAt => single(self.completed_at().map(FilterValue::Timestamp)),
            TaskField::CreatedAt => vec![FilterValue::Timestamp(self.created_at())],
            TaskField::UpdatedAt => vec![FilterValue::Timestamp(self.updated_at())],
        }
    }
}

impl Filterable for BlockerEdge {
    type Field = BlockerField;

    fn field_values(&self, field: BlockerField) -> Vec<FilterValue> {
        match field {
            BlockerField::Id => vec![FilterValue::Text(self.id().to_string())],
            BlockerField::TaskId => vec![self.task_id().into()],
            BlockerField::BlockerId => vec![self.blocker_id().into()],
            BlockerField::Owner => vec![self.owner().into()],
            BlockerField::CreatedAt => vec![FilterValue::Timestamp(self.created_at())],
        }
    }
}
