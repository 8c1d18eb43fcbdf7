//! Session backend abstraction.
//!
//! The orchestrator drives one session through this trait; the production
//! implementation wires the sqlx-backed connection and executor together,
//! and tests substitute a scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::errors::AppResult;
use common::models::{ConnectionDescriptor, QueryResult};

use crate::connection::LiveConnection;
use crate::executor;

/// Metadata reported by a successfully opened session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub server_version: String,
    pub data_source: String,
    pub opened_at: DateTime<Utc>,
}

/// One database session: open, execute, close.
#[async_trait]
pub trait SessionBackend {
    /// Establishes the session. Single attempt, no retry.
    async fn open(&mut self, descriptor: &ConnectionDescriptor) -> AppResult<SessionInfo>;

    /// Executes one statement on the open session.
    async fn execute(&mut self, sql: &str) -> AppResult<QueryResult>;

    /// Releases the session if one is live. Idempotent; returns true when a
    /// session was actually closed.
    async fn close(&mut self) -> bool;
}

/// sqlx-backed session.
pub struct SqlSession {
    connect_timeout: Duration,
    connection: Option<LiveConnection>,
}

impl SqlSession {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            connection: None,
        }
    }
}

#[async_trait]
impl SessionBackend for SqlSession {
    async fn open(&mut self, descriptor: &ConnectionDescriptor) -> AppResult<SessionInfo> {
        let connection = LiveConnection::open(descriptor, self.connect_timeout).await?;
        let info = SessionInfo {
            server_version: connection.server_version.clone(),
            data_source: connection.data_source.clone(),
            opened_at: connection.opened_at,
        };
        self.connection = Some(connection);
        Ok(info)
    }

    async fn execute(&mut self, sql: &str) -> AppResult<QueryResult> {
        let connection = self
            .connection
            .as_mut()
            .expect("execute called before open");
        executor::execute(connection, sql).await
    }

    async fn close(&mut self) -> bool {
        match self.connection.as_mut() {
            Some(connection) if connection.is_open() => {
                connection.close().await;
                true
            }
            _ => false,
        }
    }
}
