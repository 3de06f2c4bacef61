//! Comments and time logs recorded against a task.
//!
//! Both reference their task and must be removed before the task itself can
//! be deleted permanently.

use super::{TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: Uuid,
    task_id: TaskId,
    author: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the body is blank.
    pub fn new(
        task_id: TaskId,
        author: UserId,
        body: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = body.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyComment);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            task_id,
            author,
            body: trimmed.to_owned(),
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: Uuid,
        task_id: TaskId,
        author: UserId,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            author,
            body,
            created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the task commented on.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Minutes of work logged against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    id: Uuid,
    task_id: TaskId,
    user_id: UserId,
    minutes: u32,
    logged_at: DateTime<Utc>,
}

impl TimeLog {
    /// Creates a time log entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeLog`] when `minutes` is zero.
    pub fn new(
        task_id: TaskId,
        user_id: UserId,
        minutes: u32,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        if minutes == 0 {
            return Err(TaskDomainError::InvalidTimeLog);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            minutes,
            logged_at: clock.utc(),
        })
    }

    /// Reconstructs a time log from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: Uuid,
        task_id: TaskId,
        user_id: UserId,
        minutes: u32,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            user_id,
            minutes,
            logged_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the task the time was spent on.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who logged the time.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the number of minutes logged.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Returns when the entry was recorded.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}
