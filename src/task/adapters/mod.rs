//! Adapters implementing the task ports.
//!
//! - [`memory::InMemoryTaskStore`]: thread-safe in-process storage for tests
//!   and embedded use
//! - [`postgres::PostgresTaskStore`]: `PostgreSQL` persistence using Diesel
//! - [`notifications::NotificationDispatcher`]: asynchronous delivery of
//!   task events to collaborators

pub mod memory;
pub mod notifications;
pub mod postgres;
