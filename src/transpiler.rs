//! SQL Transpiler for json2sql queries.
//!
//! Converts a built [`QuerySpec`] into an SQL statement string.

use crate::ast::*;
use crate::error::InvalidQuery;

/// Trait for converting query models to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string, or to the diagnostic text when
    /// the query cannot be expressed.
    fn to_sql(&self) -> String;
}

impl ToSql for QuerySpec {
    fn to_sql(&self) -> String {
        self.generate().unwrap_or_else(|err| err.to_string())
    }
}

impl QuerySpec {
    /// Generate the SQL statement for this query.
    pub fn generate(&self) -> Result<String, InvalidQuery> {
        let (query_type, table) = self.target().ok_or(InvalidQuery::MissingRequiredFields)?;

        match query_type {
            QueryType::Select => Ok(self.to_select_sql(table)),
            QueryType::Insert => self.to_insert_sql(table),
            QueryType::Update => self.to_update_sql(table),
            QueryType::Delete => Ok(self.to_delete_sql(table)),
            QueryType::Other(name) => Err(InvalidQuery::UnknownQueryType(name.clone())),
        }
    }

    /// Generate SELECT SQL.
    fn to_select_sql(&self, table: &str) -> String {
        let mut sql = String::from("SELECT ");

        // Columns
        match non_empty(&self.columns) {
            Some(columns) => sql.push_str(&columns.join(", ")),
            None => sql.push('*'),
        }

        // FROM
        sql.push_str(" FROM ");
        sql.push_str(table);

        self.push_where(&mut sql);

        // GROUP BY
        if let Some(group_by) = non_empty(&self.group_by) {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by.join(", "));
        }

        // ORDER BY
        if let Some(order_by) = non_empty(&self.order_by) {
            sql.push_str(" ORDER BY ");
            sql.push_str(&join(order_by, ", "));
        }

        // LIMIT
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }

        sql
    }

    /// Generate INSERT SQL.
    fn to_insert_sql(&self, table: &str) -> Result<String, InvalidQuery> {
        let (Some(columns), Some(values)) = (non_empty(&self.columns), non_empty(&self.values))
        else {
            return Err(InvalidQuery::InsertMissingValues);
        };
        if columns.len() != values.len() {
            return Err(InvalidQuery::InsertMissingValues);
        }

        let values: Vec<String> = values.iter().map(|a| a.value.to_string()).collect();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            values.join(", ")
        ))
    }

    /// Generate UPDATE SQL.
    fn to_update_sql(&self, table: &str) -> Result<String, InvalidQuery> {
        let assignments = non_empty(&self.values).ok_or(InvalidQuery::UpdateMissingValues)?;

        let mut sql = String::from("UPDATE ");
        sql.push_str(table);
        sql.push_str(" SET ");
        sql.push_str(&join(assignments, ", "));

        self.push_where(&mut sql);
        Ok(sql)
    }

    /// Generate DELETE SQL.
    fn to_delete_sql(&self, table: &str) -> String {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(table);
        self.push_where(&mut sql);
        sql
    }

    /// Append ` WHERE a AND b ...` when there are conditions.
    fn push_where(&self, sql: &mut String) {
        if let Some(conditions) = non_empty(&self.conditions) {
            sql.push_str(" WHERE ");
            sql.push_str(&join(conditions, " AND "));
        }
    }
}

fn non_empty<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    list.as_deref().filter(|items| !items.is_empty())
}

fn join<T: ToString>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
