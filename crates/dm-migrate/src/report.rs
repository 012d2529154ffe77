//! Outcome types returned by [`crate::Migrator`].

use dm_core::Version;

/// What a successful `update()` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// The database was empty and the metadata table was created
    pub bootstrapped: bool,
    /// A baseline script ran (only possible when `bootstrapped`)
    pub baseline_applied: bool,
    /// Versions applied in this call, ascending
    pub applied: Vec<Version>,
    /// Stored version after the call
    pub final_version: Version,
}

impl UpdateReport {
    /// `true` when the call changed nothing
    pub fn is_noop(&self) -> bool {
        !self.bootstrapped && self.applied.is_empty()
    }
}

/// Read-only view of where a database stands relative to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// The metadata table exists
    pub initialized: bool,
    /// Stored version, `None` when the database is empty
    pub stored_version: Option<Version>,
    /// Versions `update()` would apply, ascending
    pub pending: Vec<Version>,
    /// Highest registered version
    pub latest: Option<Version>,
}

impl Status {
    /// `true` when nothing is pending
    pub fn is_up_to_date(&self) -> bool {
        self.initialized && self.pending.is_empty()
    }
}
