//! Typed predicate AST shared by every persistence adapter.

use crate::task::domain::{TaskId, TaskKind, TaskPriority, TaskStatus, TeamId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use thiserror::Error;

/// A column that predicates may reference.
pub trait FieldName: Copy + fmt::Debug + Send + Sync + 'static {
    /// Returns the substrate-facing field name.
    fn name(self) -> &'static str;
}

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Free text, identifiers, and enumeration values.
    Text(String),
    /// Whole numbers.
    Integer(i64),
    /// Booleans.
    Bool(bool),
    /// Calendar dates.
    Date(NaiveDate),
    /// UTC instants.
    Timestamp(DateTime<Utc>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<TaskId> for FilterValue {
    fn from(value: TaskId) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&UserId> for FilterValue {
    fn from(value: &UserId) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

impl From<&TeamId> for FilterValue {
    fn from(value: &TeamId) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

impl From<TaskStatus> for FilterValue {
    fn from(value: TaskStatus) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

impl From<TaskPriority> for FilterValue {
    fn from(value: TaskPriority) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

impl From<TaskKind> for FilterValue {
    fn from(value: TaskKind) -> Self {
        Self::Text(value.as_str().to_owned())
    }
}

/// Boolean expression over the fields `F` of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F: FieldName> {
    /// Field equals value.
    Eq(F, FilterValue),
    /// Field differs from value (missing fields differ from everything).
    NotEq(F, FilterValue),
    /// Case-insensitive substring match.
    Contains(F, String),
    /// Field holds a non-empty value.
    NotEmpty(F),
    /// Field is missing or empty.
    IsEmpty(F),
    /// Field is strictly greater than value.
    Gt(F, FilterValue),
    /// Field is strictly less than value.
    Lt(F, FilterValue),
    /// Pre-rendered expression passed through verbatim. Trusted input only.
    Raw(String),
    /// Every child holds. Empty means "no restriction".
    And(Vec<Predicate<F>>),
    /// At least one child holds. Empty never matches.
    Or(Vec<Predicate<F>>),
}

impl<F: FieldName> Predicate<F> {
    /// Matches every record.
    #[must_use]
    pub const fn always() -> Self {
        Self::And(Vec::new())
    }

    /// `field = value`.
    #[must_use]
    pub fn equals(field: F, value: impl Into<FilterValue>) -> Self {
        Self::Eq(field, value.into())
    }

    /// `field != value`.
    #[must_use]
    pub fn not_equals(field: F, value: impl Into<FilterValue>) -> Self {
        Self::NotEq(field, value.into())
    }

    /// `field ~ needle`.
    #[must_use]
    pub fn contains(field: F, needle: impl Into<String>) -> Self {
        Self::Contains(field, needle.into())
    }

    /// Field is set and non-empty.
    #[must_use]
    pub const fn not_empty(field: F) -> Self {
        Self::NotEmpty(field)
    }

    /// Field is unset or empty.
    #[must_use]
    pub const fn is_empty(field: F) -> Self {
        Self::IsEmpty(field)
    }

    /// `field > value`.
    #[must_use]
    pub fn greater_than(field: F, value: impl Into<FilterValue>) -> Self {
        Self::Gt(field, value.into())
    }

    /// `field < value`.
    #[must_use]
    pub fn less_than(field: F, value: impl Into<FilterValue>) -> Self {
        Self::Lt(field, value.into())
    }

    /// Verbatim expression. Never build this from user input.
    #[must_use]
    pub fn raw(expression: impl Into<String>) -> Self {
        Self::Raw(expression.into())
    }

    /// Any of `predicates`.
    #[must_use]
    pub fn or(predicates: impl IntoIterator<Item = Self>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    /// All of `predicates`.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Self>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    /// Conjoins `other`, flattening nested conjunctions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut items = match self {
            Self::And(items) => items,
            single => vec![single],
        };
        match other {
            Self::And(more) => items.extend(more),
            single => items.push(single),
        }
        Self::And(items)
    }
}

/// Ordering applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<F: FieldName> {
    /// Field to sort on.
    pub field: F,
    /// Sort largest first.
    pub descending: bool,
}

impl<F: FieldName> SortKey<F> {
    /// Ascending order on `field`.
    #[must_use]
    pub const fn ascending(field: F) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub const fn descending(field: F) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// Errors raised when a predicate cannot be applied by an adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Raw expressions only make sense to the expression renderer.
    #[error("raw predicate '{0}' is not supported by this adapter")]
    RawUnsupported(String),
    /// The operator cannot be applied to the field.
    #[error("operator {operator} is not supported on field {field}")]
    UnsupportedOperator {
        /// Operator name.
        operator: &'static str,
        /// Field name.
        field: &'static str,
    },
}
