//! SQL query models.
//!
//! Contains models for SQL query execution results.

use serde::{Deserialize, Serialize};

/// Result of a SQL statement execution.
///
/// Row-returning statements are materialized eagerly: `rows` holds the full
/// result set and `row_count == rows.len()`. Statements with no tabular
/// result leave `columns`/`rows` empty and report `affected_rows` instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column information, in result-set order.
    pub columns: Vec<ColumnInfo>,

    /// Row data (each row is a vector of JSON values).
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Number of rows returned.
    #[serde(default)]
    pub row_count: usize,

    /// Number of rows affected (for INSERT/UPDATE/DELETE).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,

    /// Statement execution time in milliseconds.
    #[serde(default)]
    pub execution_time_ms: u64,
}

/// Column information in a query result.
#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type, as reported by the server.
    pub data_type: String,

    /// Whether the column is nullable (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl QueryResult {
    /// Creates a result holding a materialized row set.
    pub fn rows(
        columns: Vec<ColumnInfo>,
        rows: Vec<Vec<serde_json::Value>>,
        execution_time_ms: u64,
    ) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            affected_rows: None,
            execution_time_ms,
        }
    }

    /// Creates a result with an affected-row count (for non-row statements).
    pub fn affected(affected: u64, execution_time_ms: u64) -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            row_count: 0,
            affected_rows: Some(affected),
            execution_time_ms,
        }
    }
}
