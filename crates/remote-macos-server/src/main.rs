//! Remote macOS MCP server: entry point.
//!
//! Serves the remote-control tools over MCP on stdin/stdout.  Every tool call
//! resolves the VNC target from the environment, opens a fresh session,
//! performs its input and disconnects.
//!
//! # Usage
//!
//! ```text
//! remote-macos-mcp [OPTIONS] [COMMAND]
//!
//! Commands:
//!   serve   Serve the MCP tools over stdio [default]
//!   probe   Connect to the configured target once and disconnect
//!
//! Options:
//!   --log-level <FILTER>   Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Environment
//!
//! | Variable             | Default | Description                          |
//! |----------------------|---------|--------------------------------------|
//! | `MACOS_HOST`         |         | Host name or `[IPv6]`, optional port |
//! | `MACOS_PORT`         | `5900`  | VNC port                             |
//! | `MACOS_USERNAME`     |         | Logged only; not sent                |
//! | `MACOS_PASSWORD`     |         | VNC password                         |
//! | `MACOS_VNC_TIMEOUT`  | `8.0`   | Connect and capture timeout, seconds |
//! | `REMOTE_MACOS_LOG`   | `info`  | Same as `--log-level`                |
//! | `RUST_LOG`           |         | Overrides `--log-level`              |
//!
//! Logs go to stderr; stdout belongs to the MCP transport.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remote_macos_server::application::remote_control::RemoteControl;
use remote_macos_server::infrastructure::env::EnvTargetProvider;
use remote_macos_server::infrastructure::mcp::RemoteMacosServer;
use remote_macos_server::infrastructure::vnc::VncConnector;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// MCP server controlling a remote macOS machine over VNC.
#[derive(Debug, Parser)]
#[command(
    name = "remote-macos-mcp",
    about = "MCP tools for controlling a remote macOS machine over VNC",
    version
)]
struct Cli {
    /// Log filter used when `RUST_LOG` is not set, e.g. `debug` or
    /// `remote_macos_server=trace`.
    #[arg(long, default_value = "info", env = "REMOTE_MACOS_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Serve the MCP tools over stdio.
    Serve,
    /// Connect to the configured target, wait for it to settle, disconnect.
    Probe,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let control = RemoteControl::new(Arc::new(EnvTargetProvider), Arc::new(VncConnector));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(control).await,
        Command::Probe => {
            let target = control.probe().await?;
            println!("connected to {target}");
            Ok(())
        }
    }
}

async fn serve(control: RemoteControl) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Remote macOS MCP server starting");

    let service = RemoteMacosServer::new(control)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("Remote macOS MCP server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
