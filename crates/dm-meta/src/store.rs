//! Reads and writes the stored schema version.
//!
//! [`MetaStore`] never opens a transaction on its own except in
//! [`MetaStore::write_version`] and [`MetaStore::bootstrap`]; every other
//! write joins whatever transaction the caller has open.

use crate::error::{MetaError, MetaResult};
use crate::schema::{self, MetaKey, META_DATA_COLUMN, META_INFO_COLUMN, META_TABLE};
use dm_core::Version;
use dm_db::{with_transaction, Database};

/// Metadata table accessor over a borrowed connection.
pub struct MetaStore<'a> {
    db: &'a dyn Database,
}

impl<'a> MetaStore<'a> {
    /// Wrap a connection.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Whether the catalog lists the metadata table.
    ///
    /// Identifiers are case-insensitive in SQL, so the comparison is too.
    pub fn table_exists(&self) -> MetaResult<bool> {
        let tables = self.db.list_tables()?;
        Ok(Self::contains_table(&tables))
    }

    /// Whether `tables` (a catalog listing) includes the metadata table.
    pub fn contains_table(tables: &[String]) -> bool {
        tables.iter().any(|t| t.eq_ignore_ascii_case(META_TABLE))
    }

    /// `CREATE TABLE IF NOT EXISTS dbMetaInfo (...)`.
    pub fn create_table(&self) -> MetaResult<()> {
        self.db.execute(&schema::create_table_sql())?;
        Ok(())
    }

    /// Insert one row per version key with value `0`.
    ///
    /// Runs inside the caller's transaction; on error the caller must roll
    /// back so no partial set of rows survives.
    pub fn insert_zero_rows(&self) -> MetaResult<()> {
        let sql = schema::insert_row_sql();
        for key in MetaKey::ALL {
            self.db.execute_with_params(&sql, &[key.as_str(), "0"])?;
        }
        Ok(())
    }

    /// Create the table and its zero rows in one transaction.
    pub fn bootstrap(&self) -> MetaResult<()> {
        with_transaction(self.db, |_| {
            self.create_table()?;
            self.insert_zero_rows()
        })?;
        log::debug!("Created {META_TABLE} with version 0.0.0");
        Ok(())
    }

    /// Integer stored under `key`.
    ///
    /// `None` when the row is missing, NULL, or not an integer. Driver errors
    /// are returned as [`MetaError::ExecutionFailed`].
    pub fn read_field(&self, key: MetaKey) -> MetaResult<Option<i64>> {
        let raw = self
            .db
            .query_optional_string(&schema::select_value_sql(), &[key.as_str()])?;
        Ok(raw.and_then(|value| value.trim().parse::<i64>().ok()))
    }

    /// Check the metadata table has the `info` and `data` columns.
    ///
    /// A table of any other shape is reported as
    /// [`MetaError::SchemaMismatch`] naming the first absent column.
    pub fn check_shape(&self) -> MetaResult<()> {
        let columns = self.db.list_columns(META_TABLE)?;
        for required in [META_INFO_COLUMN, META_DATA_COLUMN] {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(required)) {
                return Err(MetaError::SchemaMismatch {
                    table: META_TABLE.to_string(),
                    column: required.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Stored version.
    ///
    /// Fails with [`MetaError::SchemaMismatch`] when the table has the wrong
    /// columns, and with [`MetaError::MetadataCorrupt`] naming the first key
    /// that is missing or does not fit a version component.
    pub fn read_version(&self) -> MetaResult<Version> {
        self.check_shape()?;
        let mut components = [0u32; 3];
        for (slot, key) in components.iter_mut().zip(MetaKey::ALL) {
            *slot = self
                .read_field(key)?
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| MetaError::MetadataCorrupt {
                    key: key.as_str().to_string(),
                })?;
        }
        Ok(Version::new(components[0], components[1], components[2]))
    }

    /// Set the row for `key` to `value` inside the caller's transaction.
    ///
    /// A missing row is reported as [`MetaError::MetadataCorrupt`] rather
    /// than silently updating nothing.
    pub fn write_field(&self, key: MetaKey, value: u32) -> MetaResult<()> {
        let value = value.to_string();
        let updated = self
            .db
            .execute_with_params(&schema::update_value_sql(), &[value.as_str(), key.as_str()])?;
        if updated == 0 {
            return Err(MetaError::MetadataCorrupt {
                key: key.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Write all three components inside the caller's transaction.
    pub fn stage_version(&self, version: Version) -> MetaResult<()> {
        self.write_field(MetaKey::Major, version.major())?;
        self.write_field(MetaKey::Minor, version.minor())?;
        self.write_field(MetaKey::Update, version.update())?;
        Ok(())
    }

    /// Write all three components in their own transaction.
    ///
    /// If any field fails, the previously committed version is left intact.
    pub fn write_version(&self, version: Version) -> MetaResult<()> {
        with_transaction(self.db, |_| self.stage_version(version))?;
        log::debug!("Stored schema version {version}");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
