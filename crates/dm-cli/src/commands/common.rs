//! Shared utilities for CLI commands

use dm_core::Version;
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that the database connection is closed before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs never prints it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Render an optional version, `-` when absent
pub(crate) fn display_version(version: Option<Version>) -> String {
    version.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render a list of versions as `1.0.0, 1.1.0`
pub(crate) fn join_versions(versions: &[Version]) -> String {
    versions
        .iter()
        .map(Version::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
