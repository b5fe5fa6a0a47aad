//! Directory configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file at all) is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! database: /var/lib/customers/customers.db
//! table_prefix: crm_
//! page_size: 10
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use directory_sqlite::TableNames;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of items per page in list menus.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "customers.db";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Page size must be at least one.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// Table prefix contains characters other than alphanumerics and underscores.
    #[error("invalid table prefix '{0}'")]
    InvalidPrefix(String),
}

/// Runtime settings for the directory console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// SQLite database file.
    pub database: PathBuf,
    /// Prefix prepended to both table names.
    pub table_prefix: String,
    /// Items per page in contact and phone lists.
    pub page_size: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            table_prefix: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DirectoryConfig {
    /// Loads configuration from a YAML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Applies command-line overrides on top of this configuration.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        table_prefix: Option<String>,
        page_size: Option<usize>,
    ) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(prefix) = table_prefix {
            self.table_prefix = prefix;
        }
        if let Some(page_size) = page_size {
            self.page_size = page_size;
        }
        self
    }

    /// Checks page size and table prefix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if TableNames::new(&self.table_prefix).is_err() {
            return Err(ConfigError::InvalidPrefix(self.table_prefix.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.database, PathBuf::from("customers.db"));
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.page_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DirectoryConfig = serde_yaml::from_str("page_size: 10\n").unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.database, PathBuf::from("customers.db"));
    }

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
database: /tmp/crm.db
table_prefix: crm_
page_size: 3
"#;
        let config: DirectoryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/crm.db"));
        assert_eq!(config.table_prefix, "crm_");
        assert_eq!(config.page_size, 3);
    }

    #[test]
    fn test_overrides_win() {
        let config = DirectoryConfig::default().with_overrides(
            Some(PathBuf::from("other.db")),
            None,
            Some(2),
        );
        assert_eq!(config.database, PathBuf::from("other.db"));
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.page_size, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = DirectoryConfig {
            page_size: 0,
            ..DirectoryConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidPageSize)));

        let prefix = DirectoryConfig {
            table_prefix: "crm-".to_string(),
            ..DirectoryConfig::default()
        };
        assert!(matches!(prefix.validate(), Err(ConfigError::InvalidPrefix(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.yml");
        std::fs::write(&path, "table_prefix: sales_\n").unwrap();

        let config = DirectoryConfig::load(&path).unwrap();
        assert_eq!(config.table_prefix, "sales_");
        assert!(matches!(
            DirectoryConfig::load(dir.path().join("missing.yml")),
            Err(ConfigError::Io(_))
        ));
    }
}
