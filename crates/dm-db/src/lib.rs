//! dm-db - Database abstraction layer for dbmigrate
//!
//! This crate provides the synchronous `Database` trait the migration engine
//! drives, a DuckDB implementation, and the `with_transaction` helper.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod traits;
pub mod transaction;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use connect::connect;
pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use transaction::with_transaction;
