//! Task lifecycle management.
//!
//! Tasks move through a status machine and an orthogonal soft-state
//! (active, archived, trashed), may be blocked by other tasks, and may recur.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Typed filters and canned views in [`query`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod query;
pub mod services;

#[cfg(test)]
mod tests;
