//! Script loading and statement splitting.
//!
//! Splitting is purely textual: a `;` inside a string literal or a comment
//! still ends the statement. Scripts must not rely on such delimiters.

use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Character that separates statements in a script file.
pub const STATEMENT_DELIMITER: char = ';';

/// Read `path` and split its contents into executable statements.
pub fn read_statements(path: &Path) -> CoreResult<Vec<String>> {
    let content =
        std::fs::read_to_string(path).map_err(|source| CoreError::ResourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
    let statements = split_statements(&content);
    log::debug!(
        "Read {} statement(s) from {}",
        statements.len(),
        path.display()
    );
    Ok(statements)
}

/// Split on [`STATEMENT_DELIMITER`], trim, and drop blank fragments.
pub fn split_statements(script: &str) -> Vec<String> {
    script
        .split(STATEMENT_DELIMITER)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "script_reader_test.rs"]
mod tests;
