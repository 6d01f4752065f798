//! CLI module for the TeamTask API
//!
//! Provides the `serve` subcommand that runs the HTTP server.

pub mod serve;

use clap::{Parser, Subcommand};

/// TeamTask API - team registry and invitation workflow backend
#[derive(Parser)]
#[command(name = "teamtask-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
