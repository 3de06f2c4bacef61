//! `PostgreSQL` adapters for task lifecycle persistence.
//!
//! The schema lives in `migrations/`. Predicates are translated to
//! parameterised SQL; raw expressions are rejected.

mod conversion;
mod models;
mod repository;
mod schema;
pub(crate) mod sql;

pub use repository::{PostgresTaskStore, TaskPgPool};
