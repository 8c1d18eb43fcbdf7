//! SQL statement execution.
//!
//! Executes one statement on an open session and materializes the outcome
//! eagerly: a full row set for row-returning statements, an affected-row
//! count for everything else.

use std::time::{Duration, Instant};

use common::errors::{AppError, AppResult};
use common::models::QueryResult;
use common::utils::SqlClassifier;
use tokio::time::timeout;

use crate::connection::{DbConnection, LiveConnection};
use crate::decode;

/// Fixed execution timeout for a single statement.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes one SQL statement on an open session.
///
/// The session must be open; handing in a closed or faulted one is a
/// programmer error, not a recoverable condition. On timeout the session is
/// marked faulted and the statement fails with `QueryFailed("timeout")`.
/// Server-side errors are surfaced with the server's message preserved; no
/// error-code classification happens here.
pub async fn execute(connection: &mut LiveConnection, sql: &str) -> AppResult<QueryResult> {
    assert!(
        connection.is_open(),
        "execute called on a session that is not open"
    );

    let start = Instant::now();
    match timeout(COMMAND_TIMEOUT, run_statement(connection, sql)).await {
        Ok(result) => {
            let mut result = result?;
            result.execution_time_ms = start.elapsed().as_millis() as u64;
            Ok(result)
        }
        Err(_) => {
            connection.fault();
            Err(AppError::QueryFailed("timeout".into()))
        }
    }
}

async fn run_statement(connection: &mut LiveConnection, sql: &str) -> AppResult<QueryResult> {
    let conn = connection
        .conn
        .as_mut()
        .expect("open session has a backend connection");
    if SqlClassifier::returns_rows(sql) {
        fetch_rows(conn, sql).await
    } else {
        run_command(conn, sql).await
    }
}

async fn fetch_rows(conn: &mut DbConnection, sql: &str) -> AppResult<QueryResult> {
    match conn {
        DbConnection::Postgres(conn) => {
            let rows = sqlx::query(sql)
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| AppError::QueryFailed(e.to_string()))?;
            let columns = rows.first().map(decode::pg_columns).unwrap_or_default();
            let values = rows.iter().map(decode::pg_values).collect();
            Ok(QueryResult::rows(columns, values, 0))
        }
        DbConnection::MySQL(conn) => {
            let rows = sqlx::query(sql)
                .fetch_all(&mut *conn)
                .await
                .map_err(|e| AppError::QueryFailed(e.to_string()))?;
            let columns = rows.first().map(decode::mysql_columns).unwrap_or_default();
            let values = rows.iter().map(decode::mysql_values).collect();
            Ok(QueryResult::rows(columns, values, 0))
        }
    }
}

async fn run_command(conn: &mut DbConnection, sql: &str) -> AppResult<QueryResult> {
    match conn {
        DbConnection::Postgres(conn) => sqlx::query(sql)
            .execute(&mut *conn)
            .await
            .map(|done| QueryResult::affected(done.rows_affected(), 0))
            .map_err(|e| AppError::QueryFailed(e.to_string())),
        DbConnection::MySQL(conn) => sqlx::query(sql)
            .execute(&mut *conn)
            .await
            .map(|done| QueryResult::affected(done.rows_affected(), 0))
            .map_err(|e| AppError::QueryFailed(e.to_string())),
    }
}
