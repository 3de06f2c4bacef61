//! Application services for task lifecycle orchestration.

mod bulk;
mod deadline;
mod dependencies;
mod error;
mod lifecycle;
mod recurrence;

pub use bulk::{BulkItemOutcome, BulkReport};
pub use dependencies::{Dependency, DependencyGraphService};
pub use error::{TaskErrorKind, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::TaskLifecycleService;
pub use recurrence::RecurrenceEngine;
