//! Names that make up the on-disk metadata contract.
//!
//! These must match existing databases exactly: table `dbMetaInfo` with
//! `info varchar(255)` and `data varchar(255)` columns.

/// Metadata table name.
pub const META_TABLE: &str = "dbMetaInfo";

/// Key column.
pub const META_INFO_COLUMN: &str = "info";

/// Value column.
pub const META_DATA_COLUMN: &str = "data";

/// Row keys, one per version component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Major,
    Minor,
    Update,
}

impl MetaKey {
    /// All keys in the order they are inserted and read.
    pub const ALL: [MetaKey; 3] = [MetaKey::Major, MetaKey::Minor, MetaKey::Update];

    /// Value stored in the `info` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            MetaKey::Major => "v_major",
            MetaKey::Minor => "v_minor",
            MetaKey::Update => "v_update",
        }
    }
}

impl std::fmt::Display for MetaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {META_TABLE} \
         ({META_INFO_COLUMN} varchar(255), {META_DATA_COLUMN} varchar(255))"
    )
}

pub(crate) fn insert_row_sql() -> String {
    format!("INSERT INTO {META_TABLE} ({META_INFO_COLUMN}, {META_DATA_COLUMN}) VALUES (?, ?)")
}

pub(crate) fn select_value_sql() -> String {
    format!("SELECT {META_DATA_COLUMN} FROM {META_TABLE} WHERE {META_INFO_COLUMN} = ?")
}

pub(crate) fn update_value_sql() -> String {
    format!("UPDATE {META_TABLE} SET {META_DATA_COLUMN} = ? WHERE {META_INFO_COLUMN} = ?")
}
