//! CLI command definitions for the `relay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod purge;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stateful chat relay in front of an LLM inference backend.
#[derive(Parser)]
#[command(name = "relay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to relay.toml (defaults to `{data_dir}/relay.toml`).
    #[arg(long, global = true, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8787", env = "RELAY_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "RELAY_HOST")]
        host: String,
    },

    /// Print the effective configuration as TOML.
    Config,

    /// Delete expired sessions from the store.
    Purge,
}

impl Cli {
    /// Default log filter for the selected verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,chatrelay_core=debug,chatrelay_infra=debug,relay=debug",
            _ => "trace",
        }
    }
}
