//! Result presentation.
//!
//! Human-readable rendering of query outcomes, plus an optional JSON mode.

use anyhow::Context;
use common::errors::AppResult;
use common::models::QueryResult;
use serde_json::Value as JsonValue;

/// Renders a query result as a text table with a summary line.
pub fn render_table(result: &QueryResult) -> String {
    let mut output = String::new();

    if let Some(affected) = result.affected_rows {
        output.push_str(&format!(
            "✓ statement OK, {} row(s) affected ({} ms)",
            affected, result.execution_time_ms
        ));
        return output;
    }

    if !result.columns.is_empty() {
        let columns: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
        output.push_str(&format!("| {} |\n", columns.join(" | ")));
        output.push_str(&format!(
            "|{}|\n",
            columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        ));
        for row in &result.rows {
            let values: Vec<String> = row.iter().map(cell_text).collect();
            output.push_str(&format!("| {} |\n", values.join(" | ")));
        }
    }
    output.push_str(&format!(
        "({} row(s), {} ms)",
        result.row_count, result.execution_time_ms
    ));

    output
}

/// Renders a query result as pretty-printed JSON.
pub fn render_json(result: &QueryResult) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(result).context("serialize query result")?)
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
