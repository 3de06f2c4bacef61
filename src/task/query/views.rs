//! Canned task listings built from predicates.

use super::{Predicate, SortKey, TaskField};
use crate::task::domain::{TaskStatus, TeamId, UserId};

/// Soft-state listing requested by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskView {
    /// Neither archived nor trashed.
    #[default]
    Active,
    /// Archived and not trashed.
    Archived,
    /// Trashed, regardless of archive state.
    Trash,
    /// Every soft-state.
    All,
}

impl TaskView {
    /// Returns the predicate selecting this view.
    ///
    /// The archive view excludes trashed tasks so that trash takes
    /// precedence when both timestamps are set.
    #[must_use]
    pub fn predicate(self) -> Predicate<TaskField> {
        match self {
            Self::Active => Predicate::all([
                Predicate::is_empty(TaskField::DeletedAt),
                Predicate::is_empty(TaskField::ArchivedAt),
            ]),
            Self::Archived => Predicate::all([
                Predicate::not_empty(TaskField::ArchivedAt),
                Predicate::is_empty(TaskField::DeletedAt),
            ]),
            Self::Trash => Predicate::not_empty(TaskField::DeletedAt),
            Self::All => Predicate::always(),
        }
    }
}

/// Filter plus ordering for a task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    filter: Predicate<TaskField>,
    sort: Vec<SortKey<TaskField>>,
}

impl TaskQuery {
    /// Creates a query with the given filter and no ordering.
    #[must_use]
    pub const fn new(filter: Predicate<TaskField>) -> Self {
        Self {
            filter,
            sort: Vec::new(),
        }
    }

    /// Tasks in `view` that `user` owns, is assigned, or claimed, newest
    /// first.
    #[must_use]
    pub fn visible_to(user: &UserId, view: TaskView) -> Self {
        let involvement = Predicate::or([
            Predicate::equals(TaskField::Owner, user),
            Predicate::equals(TaskField::AssignedTo, user),
            Predicate::equals(TaskField::ClaimedBy, user),
        ]);
        Self::new(involvement.and(view.predicate()))
            .with_sort(SortKey::descending(TaskField::CreatedAt))
    }

    /// Active, unclaimed pool tasks of `team`, oldest first.
    #[must_use]
    pub fn team_pool(team: &TeamId) -> Self {
        let filter = Predicate::all([
            Predicate::equals(TaskField::TeamId, team),
            Predicate::equals(TaskField::Status, TaskStatus::Unassigned),
            Predicate::is_empty(TaskField::AssignedTo),
        ])
        .and(TaskView::Active.predicate());
        Self::new(filter).with_sort(SortKey::ascending(TaskField::CreatedAt))
    }

    /// Appends a sort key.
    #[must_use]
    pub fn with_sort(mut self, key: SortKey<TaskField>) -> Self {
        self.sort.push(key);
        self
    }

    /// Replaces the sort keys.
    #[must_use]
    pub fn with_sort_keys(mut self, keys: Vec<SortKey<TaskField>>) -> Self {
        self.sort = keys;
        self
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &Predicate<TaskField> {
        &self.filter
    }

    /// Returns the sort keys.
    #[must_use]
    pub fn sort(&self) -> &[SortKey<TaskField>] {
        &self.sort
    }
}
