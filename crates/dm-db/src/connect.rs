//! Backend selection from configuration.

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::traits::Database;
use dm_core::{DatabaseConfig, DbType};

/// Open a connection for `config`, returning an owned handle.
///
/// Each call yields an independent connection; nothing is registered
/// process-wide.
pub fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Database>> {
    match config.db_type {
        DbType::DuckDb => {
            if config.username.is_some() {
                log::debug!(
                    "DuckDB has no authentication; ignoring credentials for {}",
                    config.path
                );
            }
            log::debug!("Opening duckdb database at {}", config.path);
            Ok(Box::new(DuckDbBackend::new(&config.path)?))
        }
    }
}
