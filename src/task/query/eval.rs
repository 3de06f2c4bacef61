//! In-process evaluation of predicates against records.

use super::{FilterValue, Filterable, Predicate, QueryError, SortKey};
use std::cmp::Ordering;

/// Returns `true` when `record` satisfies `predicate`.
///
/// # Errors
///
/// Returns [`QueryError::RawUnsupported`] when the predicate contains a raw
/// expression, which only the expression renderer understands.
pub fn matches<R: Filterable>(
    record: &R,
    predicate: &Predicate<R::Field>,
) -> Result<bool, QueryError> {
    let outcome = match predicate {
        Predicate::Eq(field, value) => record
            .field_values(*field)
            .iter()
            .any(|candidate| candidate == value),
        Predicate::NotEq(field, value) => !record
            .field_values(*field)
            .iter()
            .any(|candidate| candidate == value),
        Predicate::Contains(field, needle) => {
            let needle_lower = needle.to_lowercase();
            record.field_values(*field).iter().any(|candidate| {
                matches!(candidate, FilterValue::Text(text) if text.to_lowercase().contains(&needle_lower))
            })
        }
        Predicate::NotEmpty(field) => record.field_values(*field).iter().any(is_present),
        Predicate::IsEmpty(field) => !record.field_values(*field).iter().any(is_present),
        Predicate::Gt(field, value) => record
            .field_values(*field)
            .iter()
            .any(|candidate| compare(candidate, value) == Some(Ordering::Greater)),
        Predicate::Lt(field, value) => record
            .field_values(*field)
            .iter()
            .any(|candidate| compare(candidate, value) == Some(Ordering::Less)),
        Predicate::Raw(expression) => return Err(QueryError::RawUnsupported(expression.clone())),
        Predicate::And(items) => {
            for item in items {
                if !matches(record, item)? {
                    return Ok(false);
                }
            }
            true
        }
        Predicate::Or(items) => {
            for item in items {
                if matches(record, item)? {
                    return Ok(true);
                }
            }
            false
        }
    };
    Ok(outcome)
}

/// Sorts `records` by `keys`, earlier keys taking precedence.
///
/// Records with no value for a key sort after those that have one, in
/// either direction.
pub fn sort_records<R: Filterable>(records: &mut [R], keys: &[SortKey<R::Field>]) {
    records.sort_by(|left, right| {
        keys.iter()
            .map(|key| {
                compare_first(
                    left.field_values(key.field).first(),
                    right.field_values(key.field).first(),
                    key.descending,
                )
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

fn compare_first(
    left: Option<&FilterValue>,
    right: Option<&FilterValue>,
    descending: bool,
) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => {
            let ordering = compare(l, r).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn is_present(value: &FilterValue) -> bool {
    !matches!(value, FilterValue::Text(text) if text.is_empty())
}

fn compare(left: &FilterValue, right: &FilterValue) -> Option<Ordering> {
    match (left, right) {
        (FilterValue::Text(l), FilterValue::Text(r)) => Some(l.cmp(r)),
        (FilterValue::Integer(l), FilterValue::Integer(r)) => Some(l.cmp(r)),
        (FilterValue::Bool(l), FilterValue::Bool(r)) => Some(l.cmp(r)),
        (FilterValue::Date(l), FilterValue::Date(r)) => Some(l.cmp(r)),
        (FilterValue::Timestamp(l), FilterValue::Timestamp(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
