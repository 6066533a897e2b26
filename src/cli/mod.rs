//! CLI module - Command-line interface for jobtracker
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// jobtracker - Job application tracking backend
#[derive(Parser)]
#[command(name = "jobtracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "server")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply database migrations and exit
    Migrate,

    /// Validate the configuration and print the effective values
    CheckConfig,

    /// List registered accounts
    Users,
}

pub use commands::*;
