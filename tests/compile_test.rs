use json2sql::prelude::*;
use json2sql::{compile, try_compile};
use pretty_assertions::assert_eq;

#[test]
fn test_select_projection() {
    let sql = compile(
        r#"{"queryType":"SELECT","table":"user_entity","columns":["id","first_name"]}"#,
    )
    .expect("select should compile");
    assert_eq!(sql, "SELECT id, first_name FROM user_entity");
}

#[test]
fn test_select_star_without_columns() {
    assert_eq!(
        compile(r#"{"queryType":"SELECT","table":"t"}"#).unwrap(),
        "SELECT * FROM t"
    );
}

#[test]
fn test_insert_quotes_strings_only() {
    let sql = compile(
        r#"{"queryType":"INSERT","table":"t","columns":["a","b"],"values":[{"a":"x","b":1}]}"#,
    )
    .unwrap();
    assert_eq!(sql, "INSERT INTO t (a, b) VALUES ('x', 1)");
}

#[test]
fn test_insert_without_values() {
    let sql = compile(r#"{"queryType":"INSERT","table":"t","columns":["a"]}"#).unwrap();
    assert_eq!(sql, "Invalid INSERT: columns or values are missing.");
    assert!(is_diagnostic(&sql));
}

#[test]
fn test_delete_quotes_numeric_condition() {
    let sql = compile(
        r#"{"queryType":"DELETE","table":"t","conditions":[{"column":"id","operator":"=","value":5}]}"#,
    )
    .unwrap();
    assert_eq!(sql, "DELETE FROM t WHERE id = '5'");
}

#[test]
fn test_numbers_keep_their_written_form() {
    let sql = compile(
        r#"{
            "queryType": "INSERT",
            "table": "t",
            "columns": ["a", "b", "c"],
            "values": [{"a": 1.50, "b": 1e2, "c": 12345678901234567890123}]
        }"#,
    )
    .unwrap();
    assert_eq!(sql, "INSERT INTO t (a, b, c) VALUES (1.50, 1e2, 12345678901234567890123)");

    let sql = compile(
        r#"{
            "queryType": "DELETE",
            "table": "t",
            "conditions": [
                {"column": "p", "operator": "=", "value": 9.90},
                {"column": "e", "operator": "<", "value": 1e2},
                {"column": "id", "operator": "=", "value": 12345678901234567890123}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(
        sql,
        "DELETE FROM t WHERE p = '9.90' AND e < '1e2' AND id = '12345678901234567890123'"
    );
}

#[test]
fn test_missing_required_fields() {
    let sql = compile(r#"{"columns":["id"],"limit":3}"#).unwrap();
    assert_eq!(sql, "Invalid query: missing required fields.");

    let err = try_compile(r#"{"columns":["id"]}"#).unwrap_err();
    assert!(matches!(
        err,
        QueryError::Invalid(InvalidQuery::MissingRequiredFields)
    ));
}

#[test]
fn test_malformed_condition_dropped() {
    let sql = compile(
        r#"{
            "queryType": "SELECT",
            "table": "user_entity",
            "conditions": [
                {"column": "first_name", "value": "John"},
                {"column": "last_name", "operator": "=", "value": "Doe"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(sql, "SELECT * FROM user_entity WHERE last_name = 'Doe'");
}

#[test]
fn test_keyword_matches_query_type() {
    let cases = [
        (r#"{"queryType":"select","table":"t"}"#, "SELECT"),
        (r#"{"queryType":"Insert","table":"t","columns":["a"],"values":[{"a":1}]}"#, "INSERT"),
        (r#"{"queryType":"update","table":"t","values":[{"a":1}]}"#, "UPDATE"),
        (r#"{"queryType":"DELETE","table":"t"}"#, "DELETE"),
    ];
    for (input, keyword) in cases {
        let sql = try_compile(input).unwrap();
        assert_eq!(sql.split_whitespace().next(), Some(keyword), "{input}");
    }
}

#[test]
fn test_compilation_is_idempotent() {
    let input = r#"{
        "queryType": "SELECT",
        "table": "orders",
        "columns": ["customer", "status"],
        "conditions": [{"column": "total", "operator": ">", "value": 100}],
        "groupBy": ["customer", "status"],
        "orderBy": [{"column": "customer", "direction": "asc"}],
        "limit": 50
    }"#;
    let first = compile(input).unwrap();
    let second = compile(input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "SELECT customer, status FROM orders WHERE total > '100' GROUP BY customer, status ORDER BY customer ASC LIMIT 50"
    );
}

#[test]
fn test_update_scenario() {
    let sql = compile(
        r#"{
            "queryType": "UPDATE",
            "table": "user_entity",
            "values": [{"last_name": "Johnson"}],
            "conditions": [{"column": "id", "operator": "=", "value": 42}]
        }"#,
    )
    .unwrap();
    assert_eq!(sql, "UPDATE user_entity SET last_name = 'Johnson' WHERE id = '42'");
}

#[test]
fn test_decode_failures_are_errors() {
    assert!(matches!(compile("not json"), Err(QueryError::Decode(_))));
    assert!(matches!(compile("[]"), Err(QueryError::NotAnObject("array"))));
    assert!(matches!(compile("null"), Err(QueryError::NotAnObject("null"))));
}

#[test]
fn test_spec_built_by_hand() {
    let mut spec = QuerySpec::new(QueryType::Select, "users");
    spec.columns = Some(vec!["id".to_string()]);
    spec.conditions = Some(vec![Condition::new("active", "=", true)]);
    spec.order_by = Some(vec![OrderSpec::new("id", SortOrder::Desc)]);
    spec.limit = Some(1);
    assert_eq!(
        spec.to_sql(),
        "SELECT id FROM users WHERE active = true ORDER BY id DESC LIMIT 1"
    );
}
