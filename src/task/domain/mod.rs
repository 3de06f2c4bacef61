//! Domain model for task lifecycle management.
//!
//! The task domain covers status and soft-state rules, team pool claiming,
//! recurrence arithmetic, and the blocker relation while keeping all
//! infrastructure concerns outside of the domain boundary.

mod activity;
mod blocker;
mod error;
mod identity;
mod ids;
mod recurrence;
mod status;
mod task;

pub use activity::{TaskComment, TimeLog};
pub use blocker::BlockerEdge;
pub use error::{DependencyViolation, ParseTaskEnumError, TaskDomainError};
pub use identity::ActingIdentity;
pub use ids::{EdgeId, TaskId, TeamId, UserId};
pub use recurrence::{Recurrence, RecurrencePattern, shift_to_date};
pub use status::{SoftState, StatusTransition, TaskKind, TaskPriority, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPatch};
