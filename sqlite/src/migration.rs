//! Lifecycle operations for the directory tables.
//!
//! Provides [`Migration`] for creating, dropping and recreating the two
//! directory tables. All mutation operations use transactions to ensure
//! atomicity.
//!
//! Recreating drops every existing row; callers are expected to ask the
//! user before doing so.
//!
//! # Example
//!
//! ```
//! use directory_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let migration = Migration::new(&conn, "crm_").unwrap();
//!
//! migration.recreate().unwrap();
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! assert_eq!(status.contact_count, 0);
//! ```

use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::schema::{TableNames, generate_drop_sql, generate_schema_sql};

/// Manages the lifecycle of the directory tables.
pub struct Migration<'a> {
    conn: &'a Connection,
    prefix: String,
    names: TableNames,
}

impl<'a> Migration<'a> {
    /// Creates a migration manager for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: &'a Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let names = TableNames::new(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            prefix,
            names,
        })
    }

    /// Creates both tables. Fails if either already exists.
    pub fn up(&self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| StoreError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Drops both tables, child before parent.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe to call even if tables
    /// do not exist.
    pub fn down(&self) -> Result<()> {
        let sql = generate_drop_sql(&self.prefix)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| StoreError::MigrationError(format!("failed to drop tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Drops and recreates both tables in a single transaction.
    pub fn recreate(&self) -> Result<()> {
        let sql = format!(
            "{}{}",
            generate_drop_sql(&self.prefix)?,
            generate_schema_sql(&self.prefix)?
        );
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| StoreError::MigrationError(format!("failed to recreate tables: {e}")))?;
        tx.commit()?;
        info!(prefix = %self.prefix, "directory tables recreated");
        Ok(())
    }

    /// Returns whether the tables exist and how many rows they hold.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.table_exists(&self.names.contact)? || !self.table_exists(&self.names.phone)? {
            return Ok(MigrationStatus::default());
        }

        Ok(MigrationStatus {
            tables_exist: true,
            contact_count: self.count_rows(&self.names.contact)?,
            phone_count: self.count_rows(&self.names.phone)?,
        })
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// Snapshot of the directory tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether both tables exist.
    pub tables_exist: bool,
    /// Number of contacts stored.
    pub contact_count: usize,
    /// Number of phone numbers stored.
    pub phone_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_new_validates_prefix() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(Migration::new(&conn, "valid_prefix_").is_ok());
        assert!(Migration::new(&conn, "").is_ok());
        assert!(matches!(
            Migration::new(&conn, "drop;--"),
            Err(StoreError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_status_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        let migration = Migration::new(&conn, "").unwrap();
        assert_eq!(migration.status().unwrap(), MigrationStatus::default());
    }

    #[test]
    fn test_up_then_down() {
        let conn = Connection::open_in_memory().unwrap();
        let migration = Migration::new(&conn, "").unwrap();
        migration.up().unwrap();
        assert!(migration.status().unwrap().tables_exist);
        assert!(matches!(migration.up(), Err(StoreError::MigrationError(_))));

        migration.down().unwrap();
        assert!(!migration.status().unwrap().tables_exist);
        migration.down().unwrap();
    }

    #[test]
    fn test_recreate_replaces_foreign_layout_and_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE contact (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO contact (name) VALUES ('legacy');",
        )
        .unwrap();

        let migration = Migration::new(&conn, "").unwrap();
        migration.recreate().unwrap();

        let status = migration.status().unwrap();
        assert!(status.tables_exist);
        assert_eq!(status.contact_count, 0);
        assert_eq!(status.phone_count, 0);
    }
}
