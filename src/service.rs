//! Compile-and-execute service.
//!
//! Wraps the compiler and a [`RowExecutor`] behind a single call that always
//! answers with a [`QueryResult`] envelope, success or not.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::ast::{QuerySpec, QueryType};
use crate::engine::{Row, RowExecutor};
use crate::error::QueryError;
use crate::parser::{self, BuildOptions};

/// Response envelope for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub successful: bool,
    /// Uppercased statement kind, when the input named one
    pub operation: Option<String>,
    pub message: String,
    /// The compiled SQL, when compilation succeeded
    pub query: Option<String>,
    /// Affected rows for writes, returned rows for SELECT
    pub rows_affected: u64,
    pub results: Vec<Row>,
}

impl QueryResult {
    fn failure(operation: Option<String>, query: Option<String>, message: String) -> Self {
        Self {
            successful: false,
            operation,
            message,
            query,
            ..Self::default()
        }
    }
}

/// A compiled statement, ready to run.
#[derive(Debug, Clone, PartialEq)]
struct Compiled {
    spec: QuerySpec,
    sql: String,
}

impl Compiled {
    fn operation(&self) -> Option<String> {
        operation_of(&self.spec)
    }
}

fn operation_of(spec: &QuerySpec) -> Option<String> {
    spec.query_type.as_ref().map(|t| t.as_str().to_string())
}

/// Compiles query documents and runs them on an executor.
pub struct QueryService<E> {
    executor: E,
    options: BuildOptions,
}

impl<E: RowExecutor> QueryService<E> {
    pub fn new(executor: E) -> Self {
        Self::with_options(executor, BuildOptions::default())
    }

    pub fn with_options(executor: E, options: BuildOptions) -> Self {
        Self { executor, options }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// See [`compile_only`].
    pub fn compile_only(&self, input: &str) -> QueryResult {
        compile_only(input, &self.options)
    }

    /// Compile and execute. SELECT fetches rows, every other statement
    /// reports its affected row count.
    pub async fn run(&self, input: &str) -> QueryResult {
        let compiled = match compile(input, &self.options) {
            Ok(compiled) => compiled,
            Err(rejection) => return rejection,
        };
        info!(sql = %compiled.sql, "translated query");

        let operation = compiled.operation();
        let outcome = match compiled.spec.query_type {
            Some(QueryType::Select) => self
                .executor
                .fetch_all(&compiled.sql)
                .await
                .map(|rows| (rows.len() as u64, rows)),
            _ => self
                .executor
                .execute(&compiled.sql)
                .await
                .map(|affected| (affected, Vec::new())),
        };

        match outcome {
            Ok((rows_affected, results)) => QueryResult {
                successful: true,
                operation,
                message: "Query executed successfully".to_string(),
                query: Some(compiled.sql),
                rows_affected,
                results,
            },
            Err(e) => {
                error!(sql = %compiled.sql, error = %e, "query execution failed");
                QueryResult::failure(operation, Some(compiled.sql), e.to_string())
            }
        }
    }
}

/// Compile without executing, answering with the same envelope as
/// [`QueryService::run`].
pub fn compile_only(input: &str, options: &BuildOptions) -> QueryResult {
    match compile(input, options) {
        Ok(compiled) => QueryResult {
            successful: true,
            operation: compiled.operation(),
            message: "Query compiled".to_string(),
            query: Some(compiled.sql),
            ..QueryResult::default()
        },
        Err(rejection) => rejection,
    }
}

/// Decode, build and generate. A failure is already the rejection envelope;
/// a query that decodes keeps its operation even when it cannot be generated.
fn compile(input: &str, options: &BuildOptions) -> Result<Compiled, QueryResult> {
    let spec = parser::parse_with(input, options).map_err(|e| rejected(None, e))?;
    match spec.generate() {
        Ok(sql) => Ok(Compiled { spec, sql }),
        Err(e) => Err(rejected(operation_of(&spec), e.into())),
    }
}

fn rejected(operation: Option<String>, e: QueryError) -> QueryResult {
    warn!(error = %e, "query rejected");
    QueryResult::failure(operation, None, e.to_string())
}
