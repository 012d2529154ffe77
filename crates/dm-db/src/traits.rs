//! Database trait definition

use crate::error::DbResult;

/// Connection abstraction driven by the migration engine.
///
/// Calls are synchronous and the engine holds exclusive ownership of the
/// connection while migrating. Transaction control is explicit: the engine
/// decides which statements share a `begin` / `commit` scope.
pub trait Database: Send + Sync {
    /// Execute a single statement, ignoring any result rows
    fn execute(&self, sql: &str) -> DbResult<()>;

    /// Execute a statement with positional `?` string parameters,
    /// returning the affected row count
    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// First column of the first row as text, or `None` when there is no row
    /// or the value is NULL
    fn query_optional_string(&self, sql: &str, params: &[&str]) -> DbResult<Option<String>>;

    /// Names of all user base tables in the database; views are not listed
    fn list_tables(&self) -> DbResult<Vec<String>>;

    /// Column names of `table` in declaration order, empty when the table
    /// does not exist. Table names match case-insensitively.
    fn list_columns(&self, table: &str) -> DbResult<Vec<String>>;

    /// Open a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

impl<D: Database + ?Sized> Database for std::sync::Arc<D> {
    fn execute(&self, sql: &str) -> DbResult<()> {
        (**self).execute(sql)
    }

    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        (**self).execute_with_params(sql, params)
    }

    fn query_optional_string(&self, sql: &str, params: &[&str]) -> DbResult<Option<String>> {
        (**self).query_optional_string(sql, params)
    }

    fn list_tables(&self) -> DbResult<Vec<String>> {
        (**self).list_tables()
    }

    fn list_columns(&self, table: &str) -> DbResult<Vec<String>> {
        (**self).list_columns(table)
    }

    fn begin(&self) -> DbResult<()> {
        (**self).begin()
    }

    fn commit(&self) -> DbResult<()> {
        (**self).commit()
    }

    fn rollback(&self) -> DbResult<()> {
        (**self).rollback()
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}
