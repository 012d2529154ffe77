//! dm-core - Core library for dbmigrate
//!
//! This crate provides the schema [`Version`] type, the [`ScriptStore`]
//! registry of baseline and delta scripts, the script reader that splits
//! script files into statements, and `dbmigrate.yml` configuration parsing.

pub mod config;
pub mod error;
pub mod script_reader;
pub mod script_store;
pub mod version;

pub use config::{Config, DatabaseConfig, DbType, MigrationConfig};
pub use error::{CoreError, CoreResult};
pub use script_reader::{read_statements, split_statements, STATEMENT_DELIMITER};
pub use script_store::{ScriptEntry, ScriptStore};
pub use version::Version;
