//! Error types for json2sql.
//!
//! Two tiers: [`QueryError`] for input that cannot be read as a query at all
//! (and for the execution layers built on top of the compiler), and
//! [`InvalidQuery`] for a well-formed query that cannot become a statement.

use thiserror::Error;

/// The main error type for json2sql operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The input text is not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The root of the document is not a JSON object.
    #[error("Decode error: expected a JSON object at the root, found {0}")]
    NotAnObject(&'static str),

    /// The query decoded but cannot be turned into SQL.
    #[error(transparent)]
    Invalid(#[from] InvalidQuery),

    /// Database connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded query that does not describe a complete statement.
///
/// The `Display` text of each variant is the diagnostic string handed back to
/// callers in place of SQL, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuery {
    /// `queryType` or `table` is absent or empty.
    #[error("Invalid query: missing required fields.")]
    MissingRequiredFields,

    /// INSERT without columns, without values, or with mismatched counts.
    #[error("Invalid INSERT: columns or values are missing.")]
    InsertMissingValues,

    /// UPDATE without any assignment.
    #[error("Invalid UPDATE: values are missing.")]
    UpdateMissingValues,

    /// `queryType` is not one of SELECT, INSERT, UPDATE, DELETE.
    #[error("Invalid query type: {0}")]
    UnknownQueryType(String),
}

/// Prefix shared by every diagnostic string.
pub const DIAGNOSTIC_PREFIX: &str = "Invalid";

/// Whether a compiler output is a diagnostic rather than a statement.
pub fn is_diagnostic(output: &str) -> bool {
    output.starts_with(DIAGNOSTIC_PREFIX)
}

/// Result type alias for json2sql operations.
pub type Json2SqlResult<T> = Result<T, QueryError>;
