//! Invocation orchestration.
//!
//! Sequences build → open → (optional) execute → close over one invocation.
//! The fallible stages run as an isolated result so the close stage executes
//! unconditionally once a connection attempt was made; a query failure never
//! prevents cleanup or suppresses the close confirmation.

use common::errors::AppResult;
use common::models::{ConnectRequest, ConnectionDescriptor, QueryResult};

use crate::presenter;
use crate::session::SessionBackend;

/// Output mode for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One probe invocation.
#[derive(Debug, Clone)]
pub struct ProbeRun {
    pub request: ConnectRequest,
    pub query: Option<String>,
    pub format: OutputFormat,
}

/// Drives one full invocation against the given session backend.
pub async fn run<B: SessionBackend>(backend: &mut B, probe: ProbeRun) -> AppResult<()> {
    let target = probe.request.into_target()?;
    let descriptor = target.descriptor();

    tracing::info!(descriptor = %descriptor, "connecting");
    println!(
        "Connecting to {} on {} ...",
        target.database,
        target.data_source()
    );

    let outcome = drive(backend, &descriptor, probe.query.as_deref(), probe.format).await;

    if backend.close().await {
        println!("✓ connection closed");
    }
    outcome
}

async fn drive<B: SessionBackend>(
    backend: &mut B,
    descriptor: &ConnectionDescriptor,
    query: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let info = backend.open(descriptor).await?;
    tracing::info!(
        server_version = %info.server_version,
        opened_at = %info.opened_at.to_rfc3339(),
        "session established"
    );
    println!(
        "✓ connected ({}, data source {})",
        info.server_version, info.data_source
    );

    let Some(sql) = query else {
        return Ok(());
    };

    let result = backend.execute(sql).await?;
    present(&result, format)
}

fn present(result: &QueryResult, format: OutputFormat) -> AppResult<()> {
    let rendered = match format {
        OutputFormat::Table => presenter::render_table(result),
        OutputFormat::Json => presenter::render_json(result)?,
    };
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use common::errors::AppError;
    use common::models::{ColumnInfo, ConnectRequest, DbType};

    use crate::session::SessionInfo;

    #[derive(Default)]
    struct FakeSession {
        fail_open: bool,
        fail_execute: bool,
        opens: usize,
        executes: usize,
        closes: usize,
        live: bool,
    }

    #[async_trait]
    impl SessionBackend for FakeSession {
        async fn open(&mut self, _descriptor: &ConnectionDescriptor) -> AppResult<SessionInfo> {
            self.opens += 1;
            if self.fail_open {
                return Err(AppError::ConnectionFailed("login failed".into()));
            }
            self.live = true;
            Ok(SessionInfo {
                server_version: "PostgreSQL 16.2".into(),
                data_source: "localhost:5432".into(),
                opened_at: Utc::now(),
            })
        }

        async fn execute(&mut self, _sql: &str) -> AppResult<QueryResult> {
            self.executes += 1;
            if self.fail_execute {
                return Err(AppError::QueryFailed("syntax error".into()));
            }
            Ok(QueryResult::rows(
                vec![ColumnInfo {
                    name: "?column?".into(),
                    data_type: "INT4".into(),
                    nullable: None,
                }],
                vec![vec![serde_json::json!(1)]],
                1,
            ))
        }

        async fn close(&mut self) -> bool {
            if self.live {
                self.live = false;
                self.closes += 1;
                true
            } else {
                false
            }
        }
    }

    fn probe(query: Option<&str>) -> ProbeRun {
        ProbeRun {
            request: ConnectRequest {
                server: "localhost".into(),
                database: "master".into(),
                db_type: DbType::Postgres,
                port: None,
                username: None,
                password: None,
                integrated_auth: true,
            },
            query: query.map(String::from),
            format: OutputFormat::Table,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_performs_no_io() {
        let mut session = FakeSession::default();
        let mut cfg = probe(None);
        cfg.request.integrated_auth = false;
        cfg.request.username = Some("".into());
        cfg.request.password = Some("x".into());

        let result = run(&mut session, cfg).await;
        assert!(matches!(result, Err(AppError::MissingCredentials(_))));
        assert_eq!(session.opens, 0);
        assert_eq!(session.closes, 0);
    }

    #[tokio::test]
    async fn test_open_failure_skips_the_query() {
        let mut session = FakeSession {
            fail_open: true,
            ..Default::default()
        };
        let result = run(&mut session, probe(Some("SELECT 1"))).await;
        assert!(matches!(result, Err(AppError::ConnectionFailed(_))));
        assert_eq!(session.executes, 0);
        assert_eq!(session.closes, 0);
    }

    #[tokio::test]
    async fn test_connect_only_invocation_runs_no_query() {
        let mut session = FakeSession::default();
        run(&mut session, probe(None)).await.unwrap();
        assert_eq!(session.opens, 1);
        assert_eq!(session.executes, 0);
        assert_eq!(session.closes, 1);
    }

    #[tokio::test]
    async fn test_query_failure_still_closes_the_session() {
        let mut session = FakeSession {
            fail_execute: true,
            ..Default::default()
        };
        let result = run(&mut session, probe(Some("SELEC 1"))).await;
        assert!(matches!(result, Err(AppError::QueryFailed(_))));
        assert_eq!(session.closes, 1);
    }

    #[tokio::test]
    async fn test_successful_query_run_closes_the_session() {
        let mut session = FakeSession::default();
        run(&mut session, probe(Some("SELECT 1"))).await.unwrap();
        assert_eq!(session.executes, 1);
        assert_eq!(session.closes, 1);
    }
}
