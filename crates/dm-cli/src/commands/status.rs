//! Status command implementation

use anyhow::{Context, Result};
use dm_core::Version;
use dm_migrate::Status;
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{display_version, join_versions, ExitCode};
use crate::context::RuntimeContext;

/// JSON shape of `dbmigrate status --json`
#[derive(Debug, Serialize)]
struct StatusOutput {
    initialized: bool,
    stored_version: Option<Version>,
    latest_version: Option<Version>,
    pending: Vec<Version>,
    up_to_date: bool,
}

impl From<&Status> for StatusOutput {
    fn from(status: &Status) -> Self {
        Self {
            initialized: status.initialized,
            stored_version: status.stored_version,
            latest_version: status.latest,
            pending: status.pending.clone(),
            up_to_date: status.is_up_to_date(),
        }
    }
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.open_migrator()?;
    let status = migrator
        .status()
        .context("Failed to inspect database version")?;
    migrator.close();

    if args.json {
        print_json(&status)?;
    } else {
        print_text(&status);
    }

    if args.check && !status.is_up_to_date() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

fn print_json(status: &Status) -> Result<()> {
    let json = serde_json::to_string_pretty(&StatusOutput::from(status))
        .context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

fn print_text(status: &Status) {
    if !status.initialized {
        println!("Database is not initialized");
    }
    println!("Stored version: {}", display_version(status.stored_version));
    println!("Latest version: {}", display_version(status.latest));
    if status.pending.is_empty() {
        println!("Pending:        none");
    } else {
        println!(
            "Pending:        {} ({})",
            status.pending.len(),
            join_versions(&status.pending)
        );
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
