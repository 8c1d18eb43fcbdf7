//! 数据库连通性诊断工具
//!
//! 单次运行完成：建立连接 → 可选执行一条 SQL → 断开连接，
//! 并以稳定的退出码报告结果（0 成功，1 任何失败）。

mod cli;
mod connection;
mod decode;
mod executor;
mod presenter;
mod runner;
mod session;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use session::SqlSession;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if present) before anything else
    load_dotenv();

    // 初始化日志追踪（stderr，避免污染结果输出）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let connect_timeout = Duration::from_secs(cli.connect_timeout);

    let probe = match cli.into_probe() {
        Ok(probe) => probe,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = SqlSession::new(connect_timeout);
    match runner::run(&mut session, probe).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "probe failed");
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load .env file from the working directory (best-effort, no error if missing).
fn load_dotenv() {
    let env_path = std::path::Path::new(".env");
    if env_path.exists() {
        if let Ok(content) = std::fs::read_to_string(env_path) {
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim();
                    // Only set if not already set by the environment
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
        }
    }
}
