//! Tasklane: an entity-lifecycle engine for tasks.
//!
//! The crate manages the life of a unit of work: creation, status
//! transitions, archive and trash soft-states, recurrence-based
//! regeneration, and blocker dependencies with cycle prevention.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and notification
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, dependency graph, recurrence, and filters
//! - [`config`]: Engine settings loaded from the environment
//! - [`telemetry`]: Structured logging setup

pub mod config;
pub mod task;
pub mod telemetry;
