//! CLI module for the Journey App Server

pub mod serve;

use clap::{Parser, Subcommand};

/// Journey App Server - journaling application backend
#[derive(Parser)]
#[command(name = "journey-server")]
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
