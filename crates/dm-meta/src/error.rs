//! Error types for the metadata store.

use dm_db::DbError;
use thiserror::Error;

/// Metadata store errors.
#[derive(Error, Debug)]
pub enum MetaError {
    /// A version row is missing or its value is not an integer (M001).
    #[error("[M001] Getting database version failed: couldn't read value \"{key}\"")]
    MetadataCorrupt { key: String },

    /// The metadata table exists but lacks a required column (M003).
    #[error("[M003] Getting database version failed: table {table} has no column \"{column}\"")]
    SchemaMismatch { table: String, column: String },

    /// Statement against the metadata table failed (M002).
    #[error("[M002] Metadata statement failed: {0}")]
    ExecutionFailed(#[from] DbError),
}

/// Result type alias for [`MetaError`].
pub type MetaResult<T> = Result<T, MetaError>;
