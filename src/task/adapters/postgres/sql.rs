//! Translation of predicates into parameterised `PostgreSQL` clauses.
//!
//! Values never reach the SQL text: every literal becomes a numbered
//! placeholder whose value is bound in order by [`bind_values`].

use crate::task::query::{
    BlockerField, FieldName, FilterValue, Predicate, QueryError, SortKey, TaskField,
};
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Date, Text, Timestamptz};

/// How a column compares against bound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    /// Text column; empty string counts as empty.
    Text,
    /// UUID column compared against textual identifiers.
    Identifier,
    /// Date or timestamp column.
    Temporal,
    /// Text array column; equality means membership.
    List,
}

/// A field with a known column mapping.
pub(crate) trait SqlField: FieldName {
    /// Returns the column name and its comparison kind.
    fn column(self) -> (&'static str, ColumnKind);
}

impl SqlField for TaskField {
    fn column(self) -> (&'static str, ColumnKind) {
        match self {
            Self::Id => ("id", ColumnKind::Identifier),
            Self::Recurrence => ("recurrence_pattern", ColumnKind::Text),
            Self::Tags => ("tags", ColumnKind::List),
            Self::DueDate
            | Self::ScheduledTime
            | Self::ClaimedAt
            | Self::ArchivedAt
            | Self::DeletedAt
            | Self::CompletedAt
            | Self::CreatedAt
            | Self::UpdatedAt => (self.name(), ColumnKind::Temporal),
            Self::Title
            | Self::Description
            | Self::Status
            | Self::Priority
            | Self::Kind
            | Self::Owner
            | Self::AssignedTo
            | Self::ClaimedBy
            | Self::TeamId
            | Self::BlockedReason
            | Self::CategoryId
            | Self::ProjectId
            | Self::ContextId => (self.name(), ColumnKind::Text),
        }
    }
}

impl SqlField for BlockerField {
    fn column(self) -> (&'static str, ColumnKind) {
        match self {
            Self::Id | Self::TaskId | Self::BlockerId => (self.name(), ColumnKind::Identifier),
            Self::Owner => (self.name(), ColumnKind::Text),
            Self::CreatedAt => (self.name(), ColumnKind::Temporal),
        }
    }
}

/// A rendered boolean clause and its bind values in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SqlClause {
    /// Clause text with `$n` placeholders.
    pub sql: String,
    /// Values for `$1..$n`.
    pub binds: Vec<FilterValue>,
}

/// Renders `predicate` as a `WHERE` clause body.
///
/// # Errors
///
/// Returns [`QueryError::RawUnsupported`] for raw expressions and
/// [`QueryError::UnsupportedOperator`] for comparisons a column kind cannot
/// express.
pub(crate) fn render_where<F: SqlField>(predicate: &Predicate<F>) -> Result<SqlClause, QueryError> {
    let mut binds = Vec::new();
    let sql = render_node(predicate, &mut binds)?;
    Ok(SqlClause { sql, binds })
}

/// Renders an `ORDER BY` list; missing values sort last, `id` breaks ties.
pub(crate) fn render_order_by<F: SqlField>(keys: &[SortKey<F>]) -> String {
    let mut parts: Vec<String> = keys
        .iter()
        .map(|key| {
            let (column, _) = key.field.column();
            let direction = if key.descending { "DESC" } else { "ASC" };
            format!("{column} {direction} NULLS LAST")
        })
        .collect();
    parts.push("id ASC".to_owned());
    parts.join(", ")
}

/// Binds `binds` to `query` in placeholder order.
pub(crate) fn bind_values(
    query: BoxedSqlQuery<'static, Pg, SqlQuery>,
    binds: Vec<FilterValue>,
) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    binds
        .into_iter()
        .fold(query, |bound, value| match value {
            FilterValue::Text(text) => bound.bind::<Text, _>(text),
            FilterValue::Integer(number) => bound.bind::<BigInt, _>(number),
            FilterValue::Bool(flag) => bound.bind::<Bool, _>(flag),
            FilterValue::Date(date) => bound.bind::<Date, _>(date),
            FilterValue::Timestamp(timestamp) => bound.bind::<Timestamptz, _>(timestamp),
        })
}

fn placeholder(binds: &mut Vec<FilterValue>, value: FilterValue, kind: ColumnKind) -> String {
    binds.push(value);
    let index = binds.len();
    if kind == ColumnKind::Identifier {
        format!("${index}::uuid")
    } else {
        format!("${index}")
    }
}

fn render_node<F: SqlField>(
    predicate: &Predicate<F>,
    binds: &mut Vec<FilterValue>,
) -> Result<String, QueryError> {
    match predicate {
        Predicate::Eq(field, value) => {
            let (column, kind) = field.column();
            let slot = placeholder(binds, value.clone(), kind);
            Ok(if kind == ColumnKind::List {
                format!("{slot} = ANY({column})")
            } else {
                format!("{column} = {slot}")
            })
        }
        Predicate::NotEq(field, value) => {
            let (column, kind) = field.column();
            let slot = placeholder(binds, value.clone(), kind);
            Ok(if kind == ColumnKind::List {
                format!("NOT ({slot} = ANY({column}))")
            } else {
                format!("{column} IS DISTINCT FROM {slot}")
            })
        }
        Predicate::Contains(field, needle) => render_contains(*field, needle, binds),
        Predicate::NotEmpty(field) => Ok(render_emptiness(*field, false)),
        Predicate::IsEmpty(field) => Ok(render_emptiness(*field, true)),
        Predicate::Gt(field, value) => render_ordering(*field, value, ">", binds),
        Predicate::Lt(field, value) => render_ordering(*field, value, "<", binds),
        Predicate::Raw(expression) => Err(QueryError::RawUnsupported(expression.clone())),
        Predicate::And(children) => render_group(children, " AND ", "TRUE", binds),
        Predicate::Or(children) => render_group(children, " OR ", "FALSE", binds),
    }
}

fn render_contains<F: SqlField>(
    field: F,
    needle: &str,
    binds: &mut Vec<FilterValue>,
) -> Result<String, QueryError> {
    let (column, kind) = field.column();
    let pattern = FilterValue::Text(format!("%{}%", escape_like(needle)));
    match kind {
        ColumnKind::Text => {
            let slot = placeholder(binds, pattern, kind);
            Ok(format!("{column} ILIKE {slot}"))
        }
        ColumnKind::List => {
            let slot = placeholder(binds, pattern, kind);
            Ok(format!(
                "EXISTS (SELECT 1 FROM unnest({column}) AS item WHERE item ILIKE {slot})"
            ))
        }
        ColumnKind::Identifier | ColumnKind::Temporal => Err(QueryError::UnsupportedOperator {
            operator: "contains",
            field: field.name(),
        }),
    }
}

fn render_emptiness<F: SqlField>(field: F, empty: bool) -> String {
    let (column, kind) = field.column();
    match (kind, empty) {
        (ColumnKind::Text, false) => format!("COALESCE({column}, '') <> ''"),
        (ColumnKind::Text, true) => format!("COALESCE({column}, '') = ''"),
        (ColumnKind::List, false) => format!("cardinality({column}) > 0"),
        (ColumnKind::List, true) => format!("cardinality({column}) = 0"),
        (ColumnKind::Identifier | ColumnKind::Temporal, false) => format!("{column} IS NOT NULL"),
        (ColumnKind::Identifier | ColumnKind::Temporal, true) => format!("{column} IS NULL"),
    }
}

fn render_ordering<F: SqlField>(
    field: F,
    value: &FilterValue,
    operator: &'static str,
    binds: &mut Vec<FilterValue>,
) -> Result<String, QueryError> {
    let (column, kind) = field.column();
    if matches!(kind, ColumnKind::List | ColumnKind::Identifier) {
        return Err(QueryError::UnsupportedOperator {
            operator,
            field: field.name(),
        });
    }
    let slot = placeholder(binds, value.clone(), kind);
    Ok(format!("{column} {operator} {slot}"))
}

fn render_group<F: SqlField>(
    children: &[Predicate<F>],
    separator: &str,
    identity: &str,
    binds: &mut Vec<FilterValue>,
) -> Result<String, QueryError> {
    if children.is_empty() {
        return Ok(identity.to_owned());
    }
    let rendered = children
        .iter()
        .map(|child| render_node(child, binds))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", rendered.join(separator)))
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for character in needle.chars() {
        if matches!(character, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
