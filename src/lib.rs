//! # json2sql
//!
//! Compiles JSON query documents into SQL statements.
//!
//! ## Quick Example
//!
//! ```rust
//! use json2sql::prelude::*;
//!
//! let spec = json2sql::parse(r#"{
//!     "queryType": "SELECT",
//!     "table": "user_entity",
//!     "columns": ["id", "first_name"],
//!     "limit": 10
//! }"#).unwrap();
//!
//! assert_eq!(spec.to_sql(), "SELECT id, first_name FROM user_entity LIMIT 10");
//! ```
//!
//! ## Pipeline
//!
//! | Stage      | Module         | Output                  |
//! |------------|----------------|-------------------------|
//! | Decode     | `serde_json`   | `serde_json::Value`     |
//! | Build      | [`parser`]     | [`ast::QuerySpec`]      |
//! | Generate   | [`transpiler`] | SQL text or diagnostic  |
//!
//! A query that decodes but cannot become a statement is not an error at
//! the text boundary: [`compile`] returns its diagnostic (always starting
//! with `Invalid`) in place of SQL. Use [`try_compile`] to get it as an
//! [`error::InvalidQuery`] instead.
//!
//! Literals are copied into the SQL text as-is. Nothing is escaped.

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod service;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{Config, OutputFormat};
    pub use crate::engine::{Database, Row, RowExecutor};
    pub use crate::error::*;
    pub use crate::parser::{BuildOptions, build, parse};
    pub use crate::service::{QueryResult, QueryService};
    pub use crate::transpiler::ToSql;
}

use crate::transpiler::ToSql;

/// Parse a JSON query document into a [`ast::QuerySpec`].
///
/// # Example
///
/// ```
/// use json2sql::parse;
///
/// let spec = parse(r#"{"queryType": "delete", "table": "sessions"}"#).unwrap();
/// assert_eq!(spec.table.as_deref(), Some("sessions"));
/// ```
pub fn parse(input: &str) -> Result<ast::QuerySpec, error::QueryError> {
    parser::parse(input)
}

/// Compile a JSON query document to SQL text, or to a diagnostic string.
///
/// Only documents that cannot be decoded as a JSON object fail.
pub fn compile(input: &str) -> Result<String, error::QueryError> {
    Ok(parser::parse(input)?.to_sql())
}

/// Compile a JSON query document, reporting diagnostics as errors.
pub fn try_compile(input: &str) -> Result<String, error::QueryError> {
    Ok(parser::parse(input)?.generate()?)
}
