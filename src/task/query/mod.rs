//! Typed filter builder for task and blocker listings.
//!
//! Predicates are assembled as an AST and rendered only at the adapter
//! boundary: to the filter-expression language by [`render_expression`], to
//! parameterised SQL by the `PostgreSQL` adapter, or evaluated in-process by
//! [`matches`].

mod eval;
mod fields;
mod predicate;
mod render;
mod views;

pub use eval::{matches, sort_records};
pub use fields::{BlockerField, Filterable, TaskField};
pub use predicate::{FieldName, FilterValue, Predicate, QueryError, SortKey};
pub use render::{escape_filter_value, render_expression, render_sort};
pub use views::{TaskQuery, TaskView};
