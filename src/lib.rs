//! `beads_mcp` - typed client and MCP server for the beads (bd) issue tracker.
//!
//! The crate never touches beads storage directly; every operation runs the
//! external `bd` executable and decodes its JSON output.
//!
//! # Architecture
//!
//! - [`config`] - environment-derived settings for invoking bd
//! - [`context`] - active workspace root and database discovery
//! - [`client`] - argument building, process execution and result decoding
//! - [`model`] - issue records returned by bd
//! - [`validation`] - tool argument checks
//! - [`server`] - MCP JSON-RPC server over stdio
//! - [`cli`] - command line for the `beads-mcp` binary
//! - [`error`] - error types

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod server;
pub mod validation;

pub use client::BdClient;
pub use config::BeadsConfig;
pub use context::WorkspaceContext;
pub use error::{BdError, Result};
pub use server::McpServer;
