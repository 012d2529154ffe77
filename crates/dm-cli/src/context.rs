//! Runtime context for CLI commands

use anyhow::{Context, Result};
use dm_core::Config;
use dm_migrate::Migrator;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Loaded configuration plus the directory its relative paths resolve against
pub(crate) struct RuntimeContext {
    /// Validated project configuration
    pub config: Config,

    /// Project directory
    pub root: PathBuf,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Load configuration from global arguments, applying the database override
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let mut config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        if let Some(database) = &args.database {
            config.database.path = resolve_override(database)?;
            log::debug!("Database path overridden to {}", config.database.path);
        }

        let ctx = Self {
            config,
            root,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Using {} database at {}",
            ctx.config.database.db_type, ctx.config.database.path
        ));
        Ok(ctx)
    }

    /// Open the configured database and register the configured scripts
    pub(crate) fn open_migrator(&self) -> Result<Migrator> {
        log::debug!(
            "Opening migrator for project {} ({} configured migration(s))",
            self.root.display(),
            self.config.migrations.len()
        );
        let migrator = Migrator::from_config(&self.config, &self.root).with_context(|| {
            format!("Failed to prepare database {}", self.config.database.path)
        })?;
        self.verbose(&format!(
            "Registered {} migration(s){}",
            migrator.scripts().len(),
            if migrator.scripts().baseline().is_some() {
                " and a baseline script"
            } else {
                ""
            }
        ));
        Ok(migrator)
    }

    /// Print verbose output if enabled
    pub(crate) fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}

/// A relative `--database` path is taken from the working directory, not the
/// project directory.
fn resolve_override(database: &str) -> Result<String> {
    let path = Path::new(database);
    if database == dm_core::config::MEMORY_DB_PATH || path.is_absolute() {
        return Ok(database.to_string());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path).to_string_lossy().into_owned())
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
