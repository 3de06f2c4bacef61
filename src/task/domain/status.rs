//! Task status, priority, kind, and derived soft-state.

use super::ParseTaskEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is under way.
    InProgress,
    /// Work cannot proceed; may carry a reason.
    Blocked,
    /// Work is complete.
    Done,
    /// Work was dropped.
    Cancelled,
    /// Team pool task that nobody has claimed yet.
    Unassigned,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            "unassigned" => Ok(Self::Unassigned),
            _ => Err(ParseTaskEnumError::new("task status", value)),
        }
    }
}

/// Describes a status change applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status before the change.
    pub previous: TaskStatus,
    /// Status after the change.
    pub current: TaskStatus,
}

impl StatusTransition {
    /// Returns `true` when the change moved the task into `done`.
    #[must_use]
    pub fn entered_done(self) -> bool {
        self.previous != TaskStatus::Done && self.current == TaskStatus::Done
    }
}

/// Relative urgency of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Needs immediate attention.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskEnumError::new("task priority", value)),
        }
    }
}

/// Whether a record is a plain task or a scheduled meeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Ordinary unit of work.
    #[default]
    Task,
    /// Calendar meeting with start and end times.
    Meeting,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Meeting => "meeting",
        }
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "meeting" => Ok(Self::Meeting),
            _ => Err(ParseTaskEnumError::new("task kind", value)),
        }
    }
}

/// Visibility state derived from the archive and trash timestamps.
///
/// Exactly one soft-state holds at a time. A set `deleted_at` wins over a set
/// `archived_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftState {
    /// Visible in default listings.
    Active,
    /// Hidden from default listings, shown in the archive view.
    Archived,
    /// Soft-deleted, shown only in the trash view.
    Trashed,
}

impl SoftState {
    /// Derives the soft-state from the two nullable timestamps.
    #[must_use]
    pub fn derive(
        archived_at: Option<DateTime<Utc>>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        match (deleted_at, archived_at) {
            (Some(_), _) => Self::Trashed,
            (None, Some(_)) => Self::Archived,
            (None, None) => Self::Active,
        }
    }
}
