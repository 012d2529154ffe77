//! Test helpers: a `Database` wrapper that records statements and injects
//! failures.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use std::sync::Mutex;

/// Wraps a real backend, records every statement it forwards, and fails
/// any statement containing one of the registered patterns.
pub struct FaultyDb<D> {
    inner: D,
    fail_patterns: Mutex<Vec<String>>,
    log: Mutex<Vec<String>>,
}

impl<D: Database> FaultyDb<D> {
    /// Wrap `inner` with no failures configured
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            fail_patterns: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Fail every statement whose text contains `pattern`
    pub fn fail_on(&self, pattern: impl Into<String>) {
        self.fail_patterns.lock().unwrap().push(pattern.into());
    }

    /// Remove all failure patterns
    pub fn clear_failures(&self) {
        self.fail_patterns.lock().unwrap().clear();
    }

    /// Every statement seen so far, including BEGIN / COMMIT / ROLLBACK
    pub fn statements(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Statements that can change data (everything except SELECT and
    /// transaction control)
    pub fn writes(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .filter(|s| {
                let upper = s.trim_start().to_ascii_uppercase();
                !(upper.starts_with("SELECT")
                    || upper.starts_with("BEGIN")
                    || upper.starts_with("COMMIT")
                    || upper.starts_with("ROLLBACK"))
            })
            .collect()
    }

    /// Forget recorded statements
    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    /// The wrapped backend
    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn record(&self, sql: &str) -> DbResult<()> {
        self.log.lock().unwrap().push(sql.to_string());
        let patterns = self.fail_patterns.lock().unwrap();
        match patterns.iter().find(|p| sql.contains(p.as_str())) {
            Some(pattern) => Err(DbError::ExecutionError(format!(
                "injected failure on '{pattern}': {sql}"
            ))),
            None => Ok(()),
        }
    }
}

impl<D: Database> Database for FaultyDb<D> {
    fn execute(&self, sql: &str) -> DbResult<()> {
        self.record(sql)?;
        self.inner.execute(sql)
    }

    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.record(&format!("{sql} {params:?}"))?;
        self.inner.execute_with_params(sql, params)
    }

    fn query_optional_string(&self, sql: &str, params: &[&str]) -> DbResult<Option<String>> {
        self.record(&format!("{sql} {params:?}"))?;
        self.inner.query_optional_string(sql, params)
    }

    fn list_tables(&self) -> DbResult<Vec<String>> {
        self.inner.list_tables()
    }

    fn list_columns(&self, table: &str) -> DbResult<Vec<String>> {
        self.inner.list_columns(table)
    }

    fn begin(&self) -> DbResult<()> {
        self.record("BEGIN TRANSACTION")?;
        self.inner.begin()
    }

    fn commit(&self) -> DbResult<()> {
        self.record("COMMIT")?;
        self.inner.commit()
    }

    fn rollback(&self) -> DbResult<()> {
        self.record("ROLLBACK")?;
        self.inner.rollback()
    }

    fn db_type(&self) -> &'static str {
        self.inner.db_type()
    }
}
