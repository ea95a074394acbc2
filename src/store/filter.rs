//! # Record Filters
//!
//! A small expression tree understood by every [`RecordStore`](super::RecordStore)
//! backend. The in-memory backend evaluates it with [`Filter::matches`], the
//! PostgreSQL backend compiles it to a `WHERE` fragment with
//! [`Filter::push_sql`].

use serde_json::Value;
use sqlx::{Postgres, QueryBuilder, types::Json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record.
    All,
    /// Field equals the JSON value.
    Eq(String, Value),
    /// Field holds an RFC 3339 timestamp strictly later than the instant.
    After(String, OffsetDateTime),
    /// Field is a string containing the needle, ignoring case.
    Contains(String, String),
    /// Every sub-filter matches. Empty matches everything.
    And(Vec<Filter>),
    /// At least one sub-filter matches. Empty matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn after(field: impl Into<String>, instant: OffsetDateTime) -> Self {
        Filter::After(field.into(), instant)
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains(field.into(), needle.into())
    }

    /// Combines two filters with AND, flattening nested conjunctions.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Combines two filters with OR, flattening nested disjunctions.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            first => Filter::Or(vec![first, other]),
        }
    }

    /// Evaluates the filter against a single record.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => record.get(field) == Some(value),
            Filter::After(field, instant) => record
                .get(field)
                .and_then(Value::as_str)
                .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
                .is_some_and(|at| at > *instant),
            Filter::Contains(field, needle) => record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|haystack| {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                }),
            Filter::And(filters) => filters.iter().all(|f| f.matches(record)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(record)),
        }
    }

    /// Appends this filter as a parenthesised boolean SQL expression over the
    /// `data` JSONB column. Every value is bound, never interpolated.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Filter::All => {
                qb.push("TRUE");
            }
            Filter::Eq(field, value) => {
                qb.push("(data -> ");
                qb.push_bind(field.clone());
                qb.push(" = ");
                qb.push_bind(Json(value.clone()));
                qb.push(")");
            }
            Filter::After(field, instant) => {
                qb.push("((data ->> ");
                qb.push_bind(field.clone());
                qb.push(")::timestamptz > ");
                qb.push_bind(*instant);
                qb.push(")");
            }
            Filter::Contains(field, needle) => {
                qb.push("(data ->> ");
                qb.push_bind(field.clone());
                qb.push(" ILIKE ");
                qb.push_bind(format!("%{}%", escape_like(needle)));
                qb.push(")");
            }
            Filter::And(filters) => push_joined(qb, filters, " AND ", "TRUE"),
            Filter::Or(filters) => push_joined(qb, filters, " OR ", "FALSE"),
        }
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &[Filter],
    separator: &str,
    empty: &str,
) {
    if filters.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        filter.push_sql(qb);
    }
    qb.push(")");
}

/// Escapes `LIKE` wildcards so the needle is matched literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
