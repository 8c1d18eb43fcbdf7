//! Single database connection lifecycle.
//!
//! A de-pooled take on connection management: one live session per
//! invocation, opened against a built descriptor and closed on every exit
//! path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use common::errors::{AppError, AppResult};
use common::models::{ConnectionDescriptor, DbType};
use sqlx::{Connection, MySqlConnection, PgConnection, Row};
use tokio::time::timeout;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Open,
    /// Unusable after a command timeout; close becomes a no-op and the
    /// socket is released when the value drops.
    Faulted,
}

/// Live backend connection, one variant per database type.
pub(crate) enum DbConnection {
    Postgres(PgConnection),
    MySQL(MySqlConnection),
}

/// A live database session.
///
/// Owned exclusively by one invocation; [`LiveConnection::close`] must run
/// on every exit path before the process terminates.
pub struct LiveConnection {
    pub(crate) conn: Option<DbConnection>,
    state: ConnectionState,
    /// Version string reported by the server.
    pub server_version: String,
    /// `host:port` of the session endpoint.
    pub data_source: String,
    /// When the session was established.
    pub opened_at: DateTime<Utc>,
}

impl LiveConnection {
    /// Opens a session against the descriptor.
    ///
    /// Exactly one attempt is made; on failure the driver's diagnostic
    /// message is carried through verbatim and no retry happens here.
    pub async fn open(
        descriptor: &ConnectionDescriptor,
        connect_timeout: Duration,
    ) -> AppResult<Self> {
        let mut conn = match timeout(connect_timeout, Self::connect(descriptor)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AppError::ConnectionFailed(format!(
                    "handshake with {} timed out after {}s",
                    descriptor.data_source(),
                    connect_timeout.as_secs()
                )))
            }
        };

        let server_version = Self::probe_version(&mut conn).await?;

        Ok(Self {
            conn: Some(conn),
            state: ConnectionState::Open,
            server_version,
            data_source: descriptor.data_source().to_string(),
            opened_at: Utc::now(),
        })
    }

    async fn connect(descriptor: &ConnectionDescriptor) -> AppResult<DbConnection> {
        match descriptor.db_type() {
            DbType::Postgres => PgConnection::connect(descriptor.url())
                .await
                .map(DbConnection::Postgres)
                .map_err(|e| AppError::ConnectionFailed(e.to_string())),
            DbType::MySQL => MySqlConnection::connect(descriptor.url())
                .await
                .map(DbConnection::MySQL)
                .map_err(|e| AppError::ConnectionFailed(e.to_string())),
        }
    }

    /// Resolves the server version right after the handshake; doubles as
    /// validation that the session actually works.
    async fn probe_version(conn: &mut DbConnection) -> AppResult<String> {
        match conn {
            DbConnection::Postgres(conn) => {
                let row = sqlx::query("SHOW server_version")
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| AppError::ConnectionFailed(e.to_string()))?;
                let version: String = row.try_get("server_version").unwrap_or_default();
                Ok(format!("PostgreSQL {}", version))
            }
            DbConnection::MySQL(conn) => {
                let row = sqlx::query("SELECT VERSION()")
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| AppError::ConnectionFailed(e.to_string()))?;
                let version: String = row.try_get(0).unwrap_or_default();
                Ok(format!("MySQL {}", version))
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Marks the session unusable after a command timeout.
    pub(crate) fn fault(&mut self) {
        self.state = ConnectionState::Faulted;
    }

    /// Closes an open session gracefully.
    ///
    /// A no-op on `Closed` and `Faulted` sessions; safe to call any number
    /// of times.
    pub async fn close(&mut self) {
        if self.state != ConnectionState::Open {
            return;
        }
        self.state = ConnectionState::Closed;
        if let Some(conn) = self.conn.take() {
            let result = match conn {
                DbConnection::Postgres(conn) => conn.close().await,
                DbConnection::MySQL(conn) => conn.close().await,
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "connection close was not clean");
            }
        }
    }

    /// Backend-less session for state-machine tests.
    #[cfg(test)]
    pub(crate) fn stub(state: ConnectionState) -> Self {
        Self {
            conn: None,
            state,
            server_version: "PostgreSQL 16.2".into(),
            data_source: "localhost:5432".into(),
            opened_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_close_transitions_open_to_closed() {
        let mut connection = LiveConnection::stub(ConnectionState::Open);
        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut connection = LiveConnection::stub(ConnectionState::Open);
        connection.close().await;
        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_close_on_faulted_is_a_noop() {
        let mut connection = LiveConnection::stub(ConnectionState::Faulted);
        connection.close().await;
        assert_eq!(connection.state(), ConnectionState::Faulted);
    }
}
