//! Configuration types and parsing for dbmigrate.yml

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main project configuration from dbmigrate.yml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Script run once when the target database is empty
    #[serde(default)]
    pub baseline: Option<String>,

    /// Versioned delta scripts (any order; applied by version)
    #[serde(default)]
    pub migrations: Vec<MigrationConfig>,
}

/// One versioned delta script
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationConfig {
    /// Version recorded once the script has been applied
    pub version: Version,

    /// Script path, relative to the project directory
    pub path: String,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Driver identifier
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Address or connection string (for DuckDB a file path or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Optional user name for drivers that authenticate
    #[serde(default)]
    pub username: Option<String>,

    /// Optional password, only meaningful together with `username`
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            username: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    /// DuckDB configuration for `path`
    pub fn duckdb(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// `true` when the database lives in memory only
    pub fn is_in_memory(&self) -> bool {
        self.path == MEMORY_DB_PATH
    }
}

/// Special path that selects an in-memory database
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Config file names searched by [`Config::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["dbmigrate.yml", "dbmigrate.yaml"];

fn default_db_path() -> String {
    MEMORY_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for dbmigrate.yml or dbmigrate.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.database.password.is_some() && self.database.username.is_none() {
            return Err(CoreError::ConfigInvalid {
                message: "database.password requires database.username".to_string(),
            });
        }

        if matches!(&self.baseline, Some(p) if p.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "baseline path cannot be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for migration in &self.migrations {
            if migration.path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("migration {} has an empty path", migration.version),
                });
            }
            if !seen.insert(migration.version) {
                return Err(CoreError::DuplicateVersion {
                    version: migration.version,
                    path: migration.path.clone(),
                });
            }
        }

        Ok(())
    }

    /// Baseline script resolved against the project root
    pub fn baseline_path_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.baseline.as_ref().map(|p| root.join(p))
    }

    /// Delta scripts resolved against the project root, in file order
    pub fn migration_paths_absolute(&self, root: &Path) -> Vec<(Version, PathBuf)> {
        self.migrations
            .iter()
            .map(|m| (m.version, root.join(&m.path)))
            .collect()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
