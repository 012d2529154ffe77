//! Schema version metadata for dbmigrate.
//!
//! The applied schema version lives in a key/value table, `dbMetaInfo`,
//! with one row per version component. [`MetaStore`] creates, reads, and
//! updates that table through a borrowed [`dm_db::Database`].

pub mod error;
pub mod schema;
pub mod store;

pub use error::{MetaError, MetaResult};
pub use schema::{MetaKey, META_DATA_COLUMN, META_INFO_COLUMN, META_TABLE};
pub use store::MetaStore;
