//! The migration tool: owns one connection and the script registry.

use crate::engine::{self, Engine};
use crate::error::{MigrationError, MigrationResult};
use crate::report::{Status, UpdateReport};
use dm_core::{Config, DatabaseConfig, ScriptStore, Version};
use dm_db::Database;
use dm_meta::MetaStore;
use std::path::{Path, PathBuf};

/// Applies registered scripts to the database it owns.
///
/// Register scripts with [`set_baseline`](Self::set_baseline) and
/// [`add_migration`](Self::add_migration), then call
/// [`update`](Self::update). Registration validates files immediately, so a
/// missing script is reported before any database work starts.
pub struct Migrator {
    db: Box<dyn Database>,
    scripts: ScriptStore,
    first_init: bool,
}

impl Migrator {
    /// Wrap an already-open connection.
    pub fn new(db: Box<dyn Database>) -> Self {
        Self {
            db,
            scripts: ScriptStore::new(),
            first_init: false,
        }
    }

    /// Open a connection described by `config`.
    pub fn open(config: &DatabaseConfig) -> MigrationResult<Self> {
        let db = dm_db::connect(config).map_err(MigrationError::Connection)?;
        Ok(Self::new(db))
    }

    /// Open the configured database and register the configured scripts.
    ///
    /// Relative database and script paths resolve against `root`.
    pub fn from_config(config: &Config, root: &Path) -> MigrationResult<Self> {
        let mut database = config.database.clone();
        if !database.is_in_memory() {
            database.path = root.join(&database.path).to_string_lossy().into_owned();
        }

        let mut migrator = Self::open(&database)?;
        if let Some(baseline) = config.baseline_path_absolute(root) {
            migrator.set_baseline(baseline)?;
        }
        for (version, path) in config.migration_paths_absolute(root) {
            migrator.add_migration_version(path, version)?;
        }
        Ok(migrator)
    }

    /// Release the connection.
    pub fn close(self) {
        log::debug!("Closing {} connection", self.db.db_type());
    }

    /// Borrow the underlying connection.
    pub fn database(&self) -> &dyn Database {
        self.db.as_ref()
    }

    /// Registered scripts.
    pub fn scripts(&self) -> &ScriptStore {
        &self.scripts
    }

    /// Register the script run once when the database is empty.
    pub fn set_baseline(&mut self, path: impl Into<PathBuf>) -> MigrationResult<()> {
        self.scripts.set_baseline(path)?;
        Ok(())
    }

    /// Register a delta script under `major.minor.update`.
    pub fn add_migration(
        &mut self,
        path: impl Into<PathBuf>,
        major: u32,
        minor: u32,
        update: u32,
    ) -> MigrationResult<()> {
        self.add_migration_version(path, Version::new(major, minor, update))
    }

    /// Register a delta script under `version`.
    pub fn add_migration_version(
        &mut self,
        path: impl Into<PathBuf>,
        version: Version,
    ) -> MigrationResult<()> {
        self.scripts.add_migration(version, path)?;
        Ok(())
    }

    /// Create the metadata table by hand.
    ///
    /// Returns `false` without writing when the table already exists. After
    /// a successful call, the next [`update`](Self::update) applies every
    /// registered delta from the first one.
    pub fn add_meta_info(&mut self) -> MigrationResult<bool> {
        let exists = MetaStore::new(self.db.as_ref())
            .table_exists()
            .map_err(MigrationError::Bootstrap)?;
        if exists {
            log::warn!("Metadata table already exists; leaving it unchanged");
            return Ok(false);
        }

        engine::bootstrap_metadata(self.db.as_ref())?;
        self.first_init = true;
        Ok(true)
    }

    /// Bring the database up to the last registered version.
    ///
    /// Calling it again once up to date performs no writes.
    pub fn update(&mut self) -> MigrationResult<UpdateReport> {
        let first_init = std::mem::take(&mut self.first_init);
        let report = Engine::new(self.db.as_ref(), &self.scripts, first_init).run()?;
        if report.is_noop() {
            log::info!("Database already at version {}", report.final_version);
        } else {
            log::info!(
                "Database migrated to version {} ({} migration(s) applied)",
                report.final_version,
                report.applied.len()
            );
        }
        Ok(report)
    }

    /// Where the database stands, without writing anything.
    pub fn status(&self) -> MigrationResult<Status> {
        engine::status(self.db.as_ref(), &self.scripts)
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
