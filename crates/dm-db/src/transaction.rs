//! Transaction scoping helper.

use crate::error::DbError;
use crate::traits::Database;

/// Execute `body` within a `begin` / `commit` transaction, rolling back on
/// error.
///
/// A failed commit is followed by a rollback and reported as the error. A
/// failed rollback is logged; the body's original error is returned.
pub fn with_transaction<D, T, E, F>(db: &D, body: F) -> Result<T, E>
where
    D: Database + ?Sized,
    E: From<DbError>,
    F: FnOnce(&D) -> Result<T, E>,
{
    db.begin()?;

    let result = body(db);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = db.commit() {
                if let Err(rollback_err) = db.rollback() {
                    log::warn!("ROLLBACK after failed COMMIT also failed: {rollback_err}");
                }
                return Err(commit_err.into());
            }
        }
        Err(_) => {
            if let Err(rollback_err) = db.rollback() {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
