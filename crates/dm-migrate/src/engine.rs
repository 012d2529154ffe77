//! Migration state machine.
//!
//! ```text
//! Uninitialized -> Bootstrapping -> ApplyingBaseline -> ApplyingDelta(v)* -> UpToDate
//!      (tables present, metadata present) ---------------^
//!      (tables present, metadata absent)  -> MetadataInvalid -> Failed
//! ```
//!
//! Any error moves the machine to `Failed`. Each baseline and delta step
//! runs in its own transaction; a delta's version row update commits with
//! the delta's statements or not at all.

use crate::error::{MigrationError, MigrationResult};
use crate::report::{Status, UpdateReport};
use dm_core::{read_statements, ScriptEntry, ScriptStore, Version};
use dm_db::{with_transaction, Database, DbResult};
use dm_meta::MetaStore;
use std::fmt;

/// Engine states, logged on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationState {
    /// Inspecting the catalog has not happened yet
    Start,
    /// The database has no tables
    Uninitialized,
    /// Creating the metadata table and its zero rows
    Bootstrapping,
    /// Tables exist but the metadata table does not
    MetadataInvalid,
    /// Running the baseline script
    ApplyingBaseline,
    /// Running the delta registered under this version
    ApplyingDelta(Version),
    /// Every registered delta is applied
    UpToDate,
    /// Stopped on an error
    Failed(String),
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Start => write!(f, "start"),
            MigrationState::Uninitialized => write!(f, "uninitialized"),
            MigrationState::Bootstrapping => write!(f, "bootstrapping"),
            MigrationState::MetadataInvalid => write!(f, "metadata-invalid"),
            MigrationState::ApplyingBaseline => write!(f, "applying-baseline"),
            MigrationState::ApplyingDelta(v) => write!(f, "applying-delta({v})"),
            MigrationState::UpToDate => write!(f, "up-to-date"),
            MigrationState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One `update()` run over a borrowed connection and registry.
pub(crate) struct Engine<'a> {
    db: &'a dyn Database,
    scripts: &'a ScriptStore,
    first_init: bool,
    state: MigrationState,
}

impl<'a> Engine<'a> {
    /// `first_init` forces delta application to start from the first
    /// registered script, as after a manual metadata bootstrap.
    pub(crate) fn new(db: &'a dyn Database, scripts: &'a ScriptStore, first_init: bool) -> Self {
        Self {
            db,
            scripts,
            first_init,
            state: MigrationState::Start,
        }
    }

    /// Drive the machine to `UpToDate` or `Failed`.
    pub(crate) fn run(mut self) -> MigrationResult<UpdateReport> {
        match self.drive() {
            Ok(report) => {
                self.transition(MigrationState::UpToDate);
                Ok(report)
            }
            Err(err) => {
                self.transition(MigrationState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: MigrationState) {
        log::debug!("Migration state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn drive(&mut self) -> MigrationResult<UpdateReport> {
        let mut report = UpdateReport::default();
        let tables = self.db.list_tables().map_err(MigrationError::Catalog)?;

        if tables.is_empty() {
            self.transition(MigrationState::Uninitialized);

            // Load the baseline first so an unreadable file fails before
            // anything is written.
            let baseline = match self.scripts.baseline() {
                Some(path) => Some(read_statements(path)?),
                None => None,
            };

            self.transition(MigrationState::Bootstrapping);
            bootstrap_metadata(self.db)?;
            self.first_init = true;
            report.bootstrapped = true;

            self.transition(MigrationState::ApplyingBaseline);
            report.baseline_applied = self.apply_baseline(baseline.as_deref())?;
        } else if !MetaStore::contains_table(&tables) {
            self.transition(MigrationState::MetadataInvalid);
            return Err(MigrationError::MetadataTableMissing);
        }

        let meta = MetaStore::new(self.db);
        let stored = meta.read_version().map_err(MigrationError::Metadata)?;

        for entry in pending_entries(self.scripts, stored, self.first_init) {
            self.transition(MigrationState::ApplyingDelta(entry.version));
            self.apply_delta(entry)?;
            report.applied.push(entry.version);
        }

        report.final_version = self.finish(stored, !report.applied.is_empty())?;
        Ok(report)
    }

    fn apply_baseline(&mut self, statements: Option<&[String]>) -> MigrationResult<bool> {
        let Some(statements) = statements else {
            log::debug!("No baseline script registered; skipping baseline");
            return Ok(false);
        };

        with_transaction(self.db, |db| {
            execute_all(db, statements).map_err(MigrationError::Baseline)
        })?;
        log::info!("Applied baseline script ({} statements)", statements.len());
        Ok(true)
    }

    fn apply_delta(&mut self, entry: &ScriptEntry) -> MigrationResult<()> {
        let statements = read_statements(&entry.path)?;
        let version = entry.version;

        with_transaction(self.db, |db| {
            execute_all(db, &statements)
                .map_err(|source| MigrationError::Delta { version, source })?;
            MetaStore::new(db)
                .stage_version(version)
                .map_err(|source| MigrationError::VersionWrite { version, source })
        })?;

        log::info!(
            "Applied migration {version} from {} ({} statements)",
            entry.path.display(),
            statements.len()
        );
        Ok(())
    }

    /// Confirm the stored version matches the last registered script after
    /// applying work, and return the stored version.
    fn finish(&mut self, stored_before: Version, applied_any: bool) -> MigrationResult<Version> {
        let meta = MetaStore::new(self.db);
        if !applied_any {
            return Ok(stored_before);
        }

        let stored = meta.read_version().map_err(MigrationError::Metadata)?;
        match self.scripts.last_version() {
            Some(last) if last != stored => {
                log::warn!("Stored version {stored} differs from last migration {last}; correcting");
                meta.write_version(last)
                    .map_err(|source| MigrationError::VersionWrite {
                        version: last,
                        source,
                    })?;
                Ok(last)
            }
            _ => Ok(stored),
        }
    }
}

/// Create the metadata table with version `0.0.0` in one transaction.
pub(crate) fn bootstrap_metadata(db: &dyn Database) -> MigrationResult<()> {
    MetaStore::new(db)
        .bootstrap()
        .map_err(MigrationError::Bootstrap)?;
    log::info!("Initialized metadata table");
    Ok(())
}

/// Scripts still to apply given the stored version.
///
/// Starts from the beginning after a bootstrap or when nothing is recorded.
/// Otherwise starts after the entry registered under `stored`; a stored
/// version with no registered entry yields nothing.
pub(crate) fn pending_entries(
    scripts: &ScriptStore,
    stored: Version,
    from_start: bool,
) -> std::slice::Iter<'_, ScriptEntry> {
    if from_start || stored.is_unset() {
        return scripts.iterate_from(None);
    }
    if scripts.contains(stored) {
        return scripts.iterate_from(Some(stored));
    }

    log::warn!("Stored version {stored} is not a registered migration; nothing to apply");
    let none: &[ScriptEntry] = &[];
    none.iter()
}

/// Inspect without writing.
pub(crate) fn status(db: &dyn Database, scripts: &ScriptStore) -> MigrationResult<Status> {
    let tables = db.list_tables().map_err(MigrationError::Catalog)?;
    let latest = scripts.last_version();

    if tables.is_empty() {
        return Ok(Status {
            initialized: false,
            stored_version: None,
            pending: scripts.entries().iter().map(|e| e.version).collect(),
            latest,
        });
    }
    if !MetaStore::contains_table(&tables) {
        return Err(MigrationError::MetadataTableMissing);
    }

    let stored = MetaStore::new(db)
        .read_version()
        .map_err(MigrationError::Metadata)?;
    Ok(Status {
        initialized: true,
        stored_version: Some(stored),
        pending: pending_entries(scripts, stored, false)
            .map(|e| e.version)
            .collect(),
        latest,
    })
}

fn execute_all(db: &dyn Database, statements: &[String]) -> DbResult<()> {
    for (idx, statement) in statements.iter().enumerate() {
        log::debug!("Executing statement {}/{}", idx + 1, statements.len());
        db.execute(statement)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
