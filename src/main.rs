//! Focus MCP Server - Main Entry Point
//!
//! The actual implementation is in the `focus_mcp` library. Logs go to
//! stderr since stdout carries the MCP protocol.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use focus_mcp::FocusServerHandler;
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Focus MCP Server - Areas, Goals and Key Results of a Markdown vault via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the vault directory
    vault: PathBuf,

    /// Commit every edited note with git and push on shutdown
    #[arg(long)]
    sync_git: bool,

    /// Layout configuration file (default: <vault>/.focus.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "focus_mcp=trace")
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let handler = FocusServerHandler::new(&args.vault, args.sync_git, args.config.as_deref())?;
    serve_stdio(handler).await?;
    Ok(())
}
