//! 命令行参数定义

use clap::Parser;
use common::errors::AppResult;
use common::models::{ConnectRequest, DbType};

use crate::runner::{OutputFormat, ProbeRun};

/// Single-shot database connectivity and query probe.
#[derive(Parser, Debug)]
#[command(name = "dbprobe")]
#[command(
    about = "Connects to a database server, optionally runs one SQL statement, and reports a scriptable exit status",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Database server host name or IP address
    #[arg(long, env = "DBPROBE_SERVER")]
    pub server: String,

    /// Database name to connect to
    #[arg(long, env = "DBPROBE_DATABASE")]
    pub database: String,

    /// Database type: postgres or mysql
    #[arg(long, default_value = "postgres")]
    pub db_type: String,

    /// Server TCP port (standard port of the database type if omitted)
    #[arg(long)]
    pub port: Option<u16>,

    /// Username for password authentication (requires --password)
    #[arg(long, env = "DBPROBE_USERNAME")]
    pub username: Option<String>,

    /// Password for password authentication (requires --username)
    #[arg(long, env = "DBPROBE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Authenticate as the operating-system account instead of a
    /// username/password pair (wins if both are supplied)
    #[arg(long, alias = "windows-auth")]
    pub integrated_auth: bool,

    /// SQL statement to execute once connected; omit to only test
    /// connectivity
    #[arg(long, short = 'q', env = "DBPROBE_QUERY")]
    pub query: Option<String>,

    /// Print query results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Connection handshake timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub connect_timeout: u64,
}

impl Cli {
    /// Converts parsed arguments into a probe run description.
    pub fn into_probe(self) -> AppResult<ProbeRun> {
        let db_type: DbType = self.db_type.parse()?;
        // A blank statement means connectivity-only, same as omitting it.
        let query = self.query.filter(|q| !q.trim().is_empty());
        Ok(ProbeRun {
            request: ConnectRequest {
                server: self.server,
                database: self.database,
                db_type,
                port: self.port,
                username: self.username,
                password: self.password,
                integrated_auth: self.integrated_auth,
            },
            query,
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_windows_auth_alias_selects_integrated() {
        let cli = Cli::parse_from([
            "dbprobe",
            "--server",
            "localhost",
            "--database",
            "master",
            "--windows-auth",
        ]);
        assert!(cli.integrated_auth);
    }

    #[test]
    fn test_blank_query_means_connectivity_only() {
        let cli = Cli::parse_from([
            "dbprobe",
            "--server",
            "localhost",
            "--database",
            "master",
            "--query",
            "   ",
        ]);
        let probe = cli.into_probe().unwrap();
        assert_eq!(probe.query, None);
    }

    #[test]
    fn test_unknown_db_type_is_rejected() {
        let cli = Cli::parse_from([
            "dbprobe",
            "--server",
            "localhost",
            "--database",
            "master",
            "--db-type",
            "oracle",
        ]);
        assert!(cli.into_probe().is_err());
    }
}
