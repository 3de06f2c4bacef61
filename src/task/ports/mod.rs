//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notifications;
pub mod repository;

pub use notifications::{
    AutomationCollaborator, CollaboratorError, CollaboratorResult, GamificationCollaborator,
    TaskEvent, TaskEventPublisher,
};
pub use repository::{
    BlockerRepository, TaskActivityRepository, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskStore,
};
