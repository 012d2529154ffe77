//! Init command implementation - adopts an existing database

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, InitArgs};
use crate::context::RuntimeContext;

/// Execute the init command
///
/// Creates the metadata table at version 0.0.0. The next `update` then
/// applies every registered migration from the first one.
pub(crate) fn execute(_args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut migrator = ctx.open_migrator()?;

    let created = migrator
        .add_meta_info()
        .context("Failed to create version metadata table")?;
    if created {
        println!("Created version metadata table at version 0.0.0");
        println!("Run `dbmigrate update` to apply all registered migrations");
    } else {
        println!("Version metadata table already exists; nothing to do");
    }

    migrator.close();
    Ok(())
}
