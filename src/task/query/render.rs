//! Rendering of predicates to the substrate filter-expression language.
//!
//! The language uses `=`, `!=`, `~` (substring), `>`, `<`, `&&` and `||`
//! with double-quoted string literals.

use super::{FieldName, FilterValue, Predicate, SortKey};

/// Escapes a value for embedding inside a quoted filter literal.
///
/// Backslashes are escaped first, then double quotes, then single quotes;
/// any other order lets crafted input close the literal.
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
}

/// Renders `predicate` as a filter expression.
///
/// An unrestricted predicate renders as the empty string.
#[must_use]
pub fn render_expression<F: FieldName>(predicate: &Predicate<F>) -> String {
    let mut out = String::new();
    write_predicate(&mut out, predicate, false);
    out
}

/// Renders sort keys as a comma-separated list, `-` marking descending.
#[must_use]
pub fn render_sort<F: FieldName>(keys: &[SortKey<F>]) -> String {
    keys.iter()
        .map(|key| {
            if key.descending {
                format!("-{}", key.field.name())
            } else {
                key.field.name().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn write_predicate<F: FieldName>(out: &mut String, predicate: &Predicate<F>, nested: bool) {
    match predicate {
        Predicate::Eq(field, value) => write_comparison(out, *field, "=", value),
        Predicate::NotEq(field, value) => write_comparison(out, *field, "!=", value),
        Predicate::Gt(field, value) => write_comparison(out, *field, ">", value),
        Predicate::Lt(field, value) => write_comparison(out, *field, "<", value),
        Predicate::Contains(field, needle) => {
            out.push_str(&format!("{} ~ \"{}\"", field.name(), escape_filter_value(needle)));
        }
        Predicate::NotEmpty(field) => {
            out.push_str(&format!("{} != \"\"", field.name()));
        }
        Predicate::IsEmpty(field) => {
            out.push_str(&format!("{} = \"\"", field.name()));
        }
        Predicate::Raw(expression) if nested => out.push_str(&format!("({expression})")),
        Predicate::Raw(expression) => out.push_str(expression),
        Predicate::And(items) => write_group(out, items, " && ", nested, "1 = 1"),
        Predicate::Or(items) => write_group(out, items, " || ", true, "1 = 0"),
    }
}

fn write_group<F: FieldName>(
    out: &mut String,
    items: &[Predicate<F>],
    separator: &str,
    parenthesize: bool,
    empty: &str,
) {
    let rendered: Vec<String> = items
        .iter()
        .filter(|item| !is_unrestricted(item))
        .map(|item| {
            let mut part = String::new();
            write_predicate(&mut part, item, true);
            part
        })
        .collect();

    match rendered.as_slice() {
        [] if parenthesize => out.push_str(empty),
        [] => {}
        [only] => out.push_str(only),
        parts if parenthesize => {
            out.push_str(&format!("({})", parts.join(separator)));
        }
        parts => out.push_str(&parts.join(separator)),
    }
}

fn is_unrestricted<F: FieldName>(predicate: &Predicate<F>) -> bool {
    matches!(predicate, Predicate::And(items) if items.iter().all(is_unrestricted))
}

fn write_comparison<F: FieldName>(out: &mut String, field: F, operator: &str, value: &FilterValue) {
    out.push_str(&format!("{} {operator} {}", field.name(), render_value(value)));
}

fn render_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(text) => format!("\"{}\"", escape_filter_value(text)),
        FilterValue::Integer(number) => number.to_string(),
        FilterValue::Bool(flag) => flag.to_string(),
        FilterValue::Date(date) => format!("\"{}\"", date.format("%Y-%m-%d")),
        FilterValue::Timestamp(instant) => {
            format!("\"{}\"", instant.format("%Y-%m-%d %H:%M:%S%.3fZ"))
        }
    }
}
