//! Registry of the baseline script and versioned delta scripts.
//!
//! Entries are kept in a `Vec` sorted by [`Version`]. Traversal computes a
//! start index with a binary search instead of holding a cursor into the
//! collection, so registration and iteration never interfere.

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A delta script registered under a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Schema version the database reaches once this script is applied
    pub version: Version,
    /// Script file location
    pub path: PathBuf,
}

/// Baseline script plus version-ordered delta scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptStore {
    baseline: Option<PathBuf>,
    entries: Vec<ScriptEntry>,
}

impl ScriptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the baseline script, replacing any previous one.
    ///
    /// Fails with [`CoreError::ResourceNotFound`] if the file cannot be opened.
    pub fn set_baseline(&mut self, path: impl Into<PathBuf>) -> CoreResult<()> {
        let path = path.into();
        ensure_readable(&path)?;
        log::debug!("Registered baseline script {}", path.display());
        self.baseline = Some(path);
        Ok(())
    }

    /// The registered baseline script, if any.
    pub fn baseline(&self) -> Option<&Path> {
        self.baseline.as_deref()
    }

    /// Register a delta script under `version`.
    ///
    /// The duplicate check runs before the file check, so a duplicate is
    /// reported even when the second path is also unreadable. On any error
    /// the store is left unchanged.
    pub fn add_migration(&mut self, version: Version, path: impl Into<PathBuf>) -> CoreResult<()> {
        let path = path.into();
        let index = match self.entries.binary_search_by(|e| e.version.cmp(&version)) {
            Ok(_) => {
                return Err(CoreError::DuplicateVersion {
                    version,
                    path: path.display().to_string(),
                })
            }
            Err(index) => index,
        };

        ensure_readable(&path)?;
        log::debug!("Registered migration {} -> {}", version, path.display());
        self.entries.insert(index, ScriptEntry { version, path });
        Ok(())
    }

    /// Entries with a version strictly greater than `after`, ascending.
    ///
    /// With `None`, yields every entry. The returned iterator is `Clone`,
    /// so callers can restart a traversal without touching the store.
    pub fn iterate_from(&self, after: Option<Version>) -> std::slice::Iter<'_, ScriptEntry> {
        let start = match after {
            Some(version) => self.entries.partition_point(|e| e.version <= version),
            None => 0,
        };
        self.entries[start..].iter()
    }

    /// Highest registered version, or `None` when no deltas are registered.
    pub fn last_version(&self) -> Option<Version> {
        self.entries.last().map(|e| e.version)
    }

    /// Whether a delta is registered under exactly `version`.
    pub fn contains(&self, version: Version) -> bool {
        self.position(version).is_some()
    }

    /// Index of the entry registered under `version`.
    pub fn position(&self, version: Version) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.version.cmp(&version))
            .ok()
    }

    /// All entries in version order.
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Number of registered delta scripts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no delta scripts are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A script must be an existing regular file that can be opened for reading.
fn ensure_readable(path: &Path) -> CoreResult<()> {
    let not_found = || CoreError::ResourceNotFound {
        path: path.display().to_string(),
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => File::open(path).map(drop).map_err(|_| not_found()),
        _ => Err(not_found()),
    }
}

#[cfg(test)]
#[path = "script_store_test.rs"]
mod tests;
