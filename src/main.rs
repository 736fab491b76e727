//! `beads-mcp` - MCP server for the beads (bd) issue tracker.
//!
//! Speaks line-delimited JSON-RPC on stdin/stdout and shells out to `bd`
//! for every operation.

fn main() {
    if let Err(e) = beads_mcp::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
