//! In-memory adapter implementations.
//!
//! These adapters keep state behind a shared lock and enforce the same
//! referential rules as the relational schema.

mod events;
mod store;

pub use events::RecordingEventPublisher;
pub use store::InMemoryTaskStore;
