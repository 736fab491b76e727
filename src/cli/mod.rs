//! Command-line interface for `beads-mcp`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::BeadsConfig;
use crate::logging::{self, LogFormat};
use crate::server::McpServer;

/// `beads-mcp` - MCP server exposing the beads (bd) issue tracker.
#[derive(Parser, Debug)]
#[command(name = "beads-mcp")]
#[command(
    author,
    version,
    about = "MCP server for the beads (bd) issue tracker",
    long_about = None,
    after_help = "Speaks JSON-RPC on stdin/stdout. Logs go to stderr."
)]
pub struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve,

    /// Print the resolved bd configuration as JSON
    Config,

    /// Show version information
    Version,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.log_json.then_some(LogFormat::Json);
    logging::init_logging(cli.verbose, cli.quiet, format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => McpServer::new().run().context("MCP server failed")?,
        Commands::Config => {
            let config = BeadsConfig::from_env();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Version => println!("beads-mcp {}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
