//! Typed query model.
//!
//! A [`QuerySpec`] is what the builder produces from a JSON document and what
//! the transpiler consumes. Every list field is optional so the model can
//! tell "not given" apart from "given but empty".

use serde::{Deserialize, Serialize};

/// The statement kind, from the `queryType` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT query
    Insert,
    /// UPDATE query
    Update,
    /// DELETE query
    Delete,
    /// Anything else, uppercased. Only ever reported back as a diagnostic.
    Other(String),
}

impl QueryType {
    /// Resolve a `queryType` value, ignoring case.
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_uppercase();
        match upper.as_str() {
            "SELECT" => QueryType::Select,
            "INSERT" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            _ => QueryType::Other(upper),
        }
    }

    /// The uppercased name, as it appears in SQL or in diagnostics.
    pub fn as_str(&self) -> &str {
        match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar destined for SQL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Text, single-quoted on output
    String(String),
    /// Number, emitted as written in the input
    Number(serde_json::Number),
    /// Boolean
    Bool(bool),
    /// NULL
    Null,
}

impl Literal {
    /// Whether the text already carries its own single quotes.
    fn is_wrapped(s: &str) -> bool {
        s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'')
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::String(s) if Literal::is_wrapped(s) => write!(f, "{}", s),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Number(n.into())
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n.into())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

/// `column = value`, used for INSERT values and UPDATE SET lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Literal,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

/// A single WHERE predicate. The operator is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: String,
    pub value: Literal,
}

impl Condition {
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Literal>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a direction, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub column: String,
    pub direction: SortOrder,
}

impl OrderSpec {
    pub fn new(column: impl Into<String>, direction: SortOrder) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl std::fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// A normalized query, built fresh for every compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Statement kind
    pub query_type: Option<QueryType>,
    /// Target table, verbatim
    pub table: Option<String>,
    /// SELECT projection or INSERT target columns
    pub columns: Option<Vec<String>>,
    /// INSERT values (aligned to `columns`) or UPDATE assignments
    pub values: Option<Vec<Assignment>>,
    /// WHERE predicates, joined with AND
    pub conditions: Option<Vec<Condition>>,
    /// ORDER BY entries
    pub order_by: Option<Vec<OrderSpec>>,
    /// GROUP BY columns
    pub group_by: Option<Vec<String>>,
    /// LIMIT
    pub limit: Option<u64>,
}

impl QuerySpec {
    /// Start a query for the given statement kind and table.
    pub fn new(query_type: QueryType, table: impl Into<String>) -> Self {
        Self {
            query_type: Some(query_type),
            table: Some(table.into()),
            ..Self::default()
        }
    }

    /// The statement kind and table, if both are present and non-empty.
    pub fn target(&self) -> Option<(&QueryType, &str)> {
        let query_type = self.query_type.as_ref()?;
        let table = self.table.as_deref().filter(|t| !t.is_empty())?;
        if query_type.as_str().is_empty() {
            return None;
        }
        Some((query_type, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_case_insensitive() {
        assert_eq!(QueryType::from_name("select"), QueryType::Select);
        assert_eq!(QueryType::from_name("Delete"), QueryType::Delete);
        assert_eq!(
            QueryType::from_name("merge"),
            QueryType::Other("MERGE".to_string())
        );
        assert_eq!(QueryType::from_name("merge").to_string(), "MERGE");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::from("Alice").to_string(), "'Alice'");
        assert_eq!(Literal::from("'already'").to_string(), "'already'");
        assert_eq!(Literal::from("'").to_string(), "'''");
        assert_eq!(Literal::from(42).to_string(), "42");
        assert_eq!(Literal::from(false).to_string(), "false");
        assert_eq!(Literal::Null.to_string(), "NULL");
    }

    #[test]
    fn test_clause_fragments() {
        assert_eq!(Condition::new("id", "=", "5").to_string(), "id = '5'");
        assert_eq!(Assignment::new("last_name", "Johnson").to_string(), "last_name = 'Johnson'");
        assert_eq!(OrderSpec::new("created_at", SortOrder::Desc).to_string(), "created_at DESC");
    }

    #[test]
    fn test_target_requires_both_fields() {
        let mut spec = QuerySpec::new(QueryType::Select, "users");
        assert!(spec.target().is_some());

        spec.table = Some(String::new());
        assert!(spec.target().is_none());

        spec.table = Some("users".to_string());
        spec.query_type = None;
        assert!(spec.target().is_none());
    }

    #[test]
    fn test_sort_order_names() {
        assert_eq!(SortOrder::from_name("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::from_name("Asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_name("sideways"), None);
    }
}
