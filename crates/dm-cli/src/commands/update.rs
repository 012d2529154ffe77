//! Update command implementation

use anyhow::{Context, Result};
use dm_migrate::ErrorKind;

use crate::cli::{GlobalArgs, UpdateArgs};
use crate::commands::common::{display_version, join_versions};
use crate::context::RuntimeContext;

/// Execute the update command
pub(crate) fn execute(args: &UpdateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut migrator = ctx.open_migrator()?;

    if args.dry_run {
        let status = migrator
            .status()
            .context("Failed to inspect database version")?;
        if !status.initialized {
            println!("Database is empty; update would create the metadata table");
            if migrator.scripts().baseline().is_some() {
                println!("  and run the baseline script");
            }
        }
        if status.pending.is_empty() {
            println!(
                "Nothing to apply (stored version {})",
                display_version(status.stored_version)
            );
        } else {
            println!("Would apply: {}", join_versions(&status.pending));
        }
        migrator.close();
        return Ok(());
    }

    let report = match migrator.update() {
        Ok(report) => report,
        Err(err) if err.kind() == ErrorKind::MetadataTableMissing => {
            return Err(anyhow::Error::new(err).context(
                "Database has tables but no version metadata; run `dbmigrate init` to adopt it",
            ));
        }
        Err(err) => return Err(err).context("Migration failed"),
    };

    if report.bootstrapped {
        println!("Created version metadata table");
    }
    if report.baseline_applied {
        println!("Applied baseline script");
    }
    for version in &report.applied {
        println!("  Applied {version}");
        ctx.verbose(&format!("Committed migration {version}"));
    }

    if report.is_noop() {
        println!("Database is up to date at version {}", report.final_version);
    } else {
        println!(
            "\nDatabase at version {} ({} migration(s) applied)",
            report.final_version,
            report.applied.len()
        );
    }

    migrator.close();
    Ok(())
}
