//! Shared data models.

pub mod connection;
pub mod query;

// Re-export commonly used types
pub use connection::{ConnectRequest, ConnectionDescriptor, ConnectionTarget, Credentials, DbType};
pub use query::{ColumnInfo, QueryResult};
