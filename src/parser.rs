//! Query model builder.
//!
//! Turns a decoded JSON document into a [`QuerySpec`].
//!
//! # Input Overview
//!
//! ```text
//! {
//!   "queryType": "SELECT",                                  ── statement kind
//!   "table": "users",                                       ── target table
//!   "columns": ["id", "email"],                             ── projection / insert columns
//!   "values": [{"email": "a@b.c"}],                         ── insert row / update pairs
//!   "conditions": [{"column": "id", "operator": "=", "value": 1}],
//!   "orderBy": [{"column": "id", "direction": "desc"}],
//!   "groupBy": ["role"],
//!   "limit": 10
//! }
//! ```
//!
//! The builder is permissive: unknown keys are ignored, a field of the wrong
//! shape is left unset, and malformed list entries are dropped one by one.
//! Only a document that is not a JSON object is rejected outright.

use serde_json::{Map, Value};
use tracing::debug;

use crate::ast::*;
use crate::error::{Json2SqlResult, QueryError};

/// Knobs for literal handling during the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Quote numbers that appear in conditions and UPDATE assignments,
    /// so `{"value": 5}` becomes `'5'`.
    pub quote_numeric_filters: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            quote_numeric_filters: true,
        }
    }
}

/// Decode and build a query from JSON text.
pub fn parse(input: &str) -> Json2SqlResult<QuerySpec> {
    parse_with(input, &BuildOptions::default())
}

/// Decode and build a query from JSON text with explicit options.
pub fn parse_with(input: &str, options: &BuildOptions) -> Json2SqlResult<QuerySpec> {
    let tree: Value = serde_json::from_str(input.trim())?;
    build_with(&tree, options)
}

/// Build a query from an already decoded document.
pub fn build(tree: &Value) -> Json2SqlResult<QuerySpec> {
    build_with(tree, &BuildOptions::default())
}

/// Build a query from an already decoded document with explicit options.
pub fn build_with(tree: &Value, options: &BuildOptions) -> Json2SqlResult<QuerySpec> {
    let Value::Object(object) = tree else {
        return Err(QueryError::NotAnObject(kind_name(tree)));
    };

    for key in object.keys() {
        if Field::from_key(key).is_none() {
            debug!(key = %key, "ignoring unrecognized key");
        }
    }

    let mut spec = QuerySpec::default();
    for field in Field::ALL {
        if let Some(value) = object.get(field.key()) {
            field.extract(value, &mut spec, options);
        }
    }
    Ok(spec)
}

/// The recognized top-level keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    QueryType,
    Table,
    Columns,
    Values,
    Conditions,
    OrderBy,
    GroupBy,
    Limit,
}

impl Field {
    /// Extraction order. `values` depends on `queryType` and `columns`, so
    /// both come first regardless of where they appear in the document.
    pub const ALL: [Field; 8] = [
        Field::QueryType,
        Field::Table,
        Field::Columns,
        Field::Values,
        Field::Conditions,
        Field::OrderBy,
        Field::GroupBy,
        Field::Limit,
    ];

    /// The JSON key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::QueryType => "queryType",
            Field::Table => "table",
            Field::Columns => "columns",
            Field::Values => "values",
            Field::Conditions => "conditions",
            Field::OrderBy => "orderBy",
            Field::GroupBy => "groupBy",
            Field::Limit => "limit",
        }
    }

    /// Look up a field by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    fn extract(self, value: &Value, spec: &mut QuerySpec, options: &BuildOptions) {
        match self {
            Field::QueryType => spec.query_type = extract_query_type(value),
            Field::Table => spec.table = extract_table(value),
            Field::Columns => spec.columns = extract_identifiers("columns", value),
            Field::GroupBy => spec.group_by = extract_identifiers("groupBy", value),
            Field::Values => {
                spec.values = match &spec.query_type {
                    Some(QueryType::Insert) => {
                        extract_insert_values(value, spec.columns.as_deref())
                    }
                    _ => extract_assignments(value, options),
                }
            }
            Field::Conditions => spec.conditions = extract_conditions(value, options),
            Field::OrderBy => spec.order_by = extract_order_by(value),
            Field::Limit => spec.limit = extract_limit(value),
        }
    }
}

/// Map every element of a JSON array through `extract`, dropping the
/// elements it rejects. Returns `None` when `value` is not an array.
pub fn best_effort<T>(
    name: &'static str,
    value: &Value,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        debug!(field = name, found = kind_name(value), "expected an array, ignoring");
        return None;
    };

    let kept = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let extracted = extract(item);
            if extracted.is_none() {
                debug!(field = name, index, "dropping malformed entry");
            }
            extracted
        })
        .collect();
    Some(kept)
}

fn extract_query_type(value: &Value) -> Option<QueryType> {
    match value {
        Value::String(s) if !s.is_empty() => Some(QueryType::from_name(s)),
        _ => None,
    }
}

fn extract_table(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// `columns` and `groupBy`: any scalar becomes its text form.
fn extract_identifiers(name: &'static str, value: &Value) -> Option<Vec<String>> {
    best_effort(name, value, scalar_text)
}

/// INSERT: the first row object supplies one value per column, in column
/// order. Columns missing from the row become NULL.
fn extract_insert_values(value: &Value, columns: Option<&[String]>) -> Option<Vec<Assignment>> {
    let Some(columns) = columns else {
        debug!("INSERT values given without columns, ignoring");
        return None;
    };
    let row = first_row(value)?;

    let values = columns
        .iter()
        .map(|column| Assignment {
            column: column.clone(),
            value: row.get(column).and_then(literal).unwrap_or(Literal::Null),
        })
        .collect();
    Some(values)
}

fn first_row(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.first()?.as_object(),
        _ => None,
    }
}

/// UPDATE and everything else: each object contributes its first entry.
fn extract_assignments(value: &Value, options: &BuildOptions) -> Option<Vec<Assignment>> {
    best_effort("values", value, |item| {
        let (column, value) = item.as_object()?.iter().next()?;
        Some(Assignment {
            column: column.clone(),
            value: filter_literal(value, options)?,
        })
    })
}

fn extract_conditions(value: &Value, options: &BuildOptions) -> Option<Vec<Condition>> {
    best_effort("conditions", value, |item| {
        let object = item.as_object()?;
        Some(Condition {
            column: name_text(object.get("column")?)?,
            operator: name_text(object.get("operator")?)?,
            value: filter_literal(object.get("value")?, options)?,
        })
    })
}

fn extract_order_by(value: &Value) -> Option<Vec<OrderSpec>> {
    best_effort("orderBy", value, |item| {
        let object = item.as_object()?;
        Some(OrderSpec {
            column: name_text(object.get("column")?)?,
            direction: SortOrder::from_name(object.get("direction")?.as_str()?)?,
        })
    })
}

/// `null` (either JSON null or the string "null") means no limit.
fn extract_limit(value: &Value) -> Option<u64> {
    let limit = match value {
        Value::Null => return None,
        Value::String(s) if s == "null" => return None,
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    if limit.is_none() {
        debug!(found = %value, "limit is not a non-negative integer, ignoring");
    }
    limit
}

/// Text form of a scalar; strings come back without quotes.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Column names and operators: non-empty, non-null scalars.
fn name_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => scalar_text(other).filter(|s| !s.is_empty()),
    }
}

fn literal(value: &Value) -> Option<Literal> {
    match value {
        Value::String(s) => Some(Literal::String(s.clone())),
        Value::Number(n) => Some(Literal::Number(n.clone())),
        Value::Bool(b) => Some(Literal::Bool(*b)),
        Value::Null => Some(Literal::Null),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Literal for a WHERE value or SET value, honoring numeric quoting.
fn filter_literal(value: &Value, options: &BuildOptions) -> Option<Literal> {
    match literal(value)? {
        Literal::Number(n) if options.quote_numeric_filters => Some(Literal::String(n.to_string())),
        other => Some(other),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
