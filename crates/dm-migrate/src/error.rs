//! Error types for the migration engine.

use dm_core::{CoreError, Version};
use dm_db::DbError;
use dm_meta::MetaError;
use thiserror::Error;

/// Migration errors.
///
/// Every variant maps onto one [`ErrorKind`] through [`MigrationError::kind`],
/// so callers can branch on the failure class without matching nested
/// sources.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Script registration or loading failed
    #[error(transparent)]
    Script(#[from] CoreError),

    /// Opening the database failed (G001)
    #[error("[G001] Opening database failed: {0}")]
    Connection(#[source] DbError),

    /// Table catalog could not be listed (G002)
    #[error("[G002] Checking database tables failed: {0}")]
    Catalog(#[source] DbError),

    /// Database has tables but no metadata table (G003)
    #[error("[G003] Checking database metainfo table failed: there is no table with meta information")]
    MetadataTableMissing,

    /// Creating the metadata table or its rows failed (G004)
    #[error("[G004] Adding database metainfo table failed: {0}")]
    Bootstrap(#[source] MetaError),

    /// A baseline statement failed; the baseline was rolled back (G005)
    #[error("[G005] Running baseline script failed: {0}")]
    Baseline(#[source] DbError),

    /// A migration statement failed; the migration was rolled back (G006)
    #[error("[G006] Running migration {version} failed: {source}")]
    Delta {
        version: Version,
        #[source]
        source: DbError,
    },

    /// Recording a migration's version failed; the migration was rolled back (G007)
    #[error("[G007] Recording version {version} failed: {source}")]
    VersionWrite {
        version: Version,
        #[source]
        source: MetaError,
    },

    /// Reading the stored version failed (G008)
    #[error("[G008] Reading database version failed: {0}")]
    Metadata(#[source] MetaError),

    /// BEGIN / COMMIT / ROLLBACK failed (G009)
    #[error("[G009] Transaction failed: {0}")]
    Transaction(#[from] DbError),
}

/// Result type alias for [`MigrationError`].
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Failure classes callers can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Script file missing or unopenable at registration
    ResourceNotFound,
    /// Script file unreadable when its statements were needed
    ResourceUnavailable,
    /// Two scripts registered under one version
    DuplicateVersion,
    /// Metadata table has the wrong columns, or a version row is missing or
    /// invalid
    MetadataCorrupt,
    /// Non-empty database without a metadata table
    MetadataTableMissing,
    /// A SQL statement or transaction command failed
    ExecutionFailed,
    /// The database could not be opened
    Connection,
    /// Invalid configuration or version string
    Configuration,
}

impl MigrationError {
    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrationError::Script(err) => match err {
                CoreError::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
                CoreError::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
                CoreError::DuplicateVersion { .. } => ErrorKind::DuplicateVersion,
                _ => ErrorKind::Configuration,
            },
            MigrationError::Connection(_) => ErrorKind::Connection,
            MigrationError::MetadataTableMissing => ErrorKind::MetadataTableMissing,
            MigrationError::Bootstrap(err)
            | MigrationError::Metadata(err)
            | MigrationError::VersionWrite { source: err, .. } => meta_kind(err),
            MigrationError::Catalog(_)
            | MigrationError::Baseline(_)
            | MigrationError::Delta { .. }
            | MigrationError::Transaction(_) => ErrorKind::ExecutionFailed,
        }
    }
}

fn meta_kind(err: &MetaError) -> ErrorKind {
    match err {
        MetaError::MetadataCorrupt { .. } | MetaError::SchemaMismatch { .. } => {
            ErrorKind::MetadataCorrupt
        }
        MetaError::ExecutionFailed(_) => ErrorKind::ExecutionFailed,
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
