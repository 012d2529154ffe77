//! dm-migrate - Migration engine for dbmigrate
//!
//! [`Migrator`] owns a database connection and a registry of scripts. Its
//! [`Migrator::update`] call detects whether the database is empty,
//! bootstraps the `dbMetaInfo` table and baseline script when it is, and
//! then applies every pending versioned script in its own transaction
//! together with the version bookkeeping.

pub mod engine;
pub mod error;
pub mod migrator;
pub mod report;

pub use engine::MigrationState;
pub use error::{ErrorKind, MigrationError, MigrationResult};
pub use migrator::Migrator;
pub use report::{Status, UpdateReport};
