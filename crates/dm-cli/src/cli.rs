//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// dbmigrate - bring a database schema up to the latest registered version
#[derive(Parser, Debug)]
#[command(name = "dbmigrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path from the config file
    #[arg(short, long, global = true, env = "DBMIGRATE_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the baseline and every pending migration
    Update(UpdateArgs),

    /// Show the stored version and pending migrations
    Status(StatusArgs),

    /// Create the metadata table in an existing database
    Init(InitArgs),
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print status as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with code 2 when migrations are pending
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
