//! SQL schema generation with customizable table prefixes.
//!
//! Generates the `CREATE TABLE` and `DROP TABLE` statements for the two
//! directory tables. All table names are prefixed with a configurable
//! string so several directories can share one database file.
//!
//! # Table structure
//!
//! - `{prefix}contact`: one row per contact
//! - `{prefix}contact_phone`: phone numbers, each referencing a contact
//!
//! Phone values are constrained at the store level to the canonical
//! 11-12 ASCII digit form produced by
//! [`PhoneNumber::parse`](directory_core::PhoneNumber::parse).

use crate::error::{Result, StoreError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
///
/// The empty prefix is allowed and yields the bare table names.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Fully prefixed table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub contact: String,
    pub phone: String,
}

impl TableNames {
    /// Builds the table names for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPrefix`] for a prefix with characters
    /// other than ASCII alphanumerics and underscores.
    pub fn new(prefix: &str) -> Result<Self> {
        validate_prefix(prefix)?;
        Ok(Self {
            contact: format!("{prefix}contact"),
            phone: format!("{prefix}contact_phone"),
        })
    }
}

/// Generates the SQL that creates both directory tables and their index.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    let TableNames { contact, phone } = TableNames::new(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE {contact} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    last_name TEXT,
    email TEXT
);

CREATE TABLE {phone} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER REFERENCES {contact}(id),
    phone TEXT CHECK (length(phone) BETWEEN 11 AND 12 AND phone NOT GLOB '*[^0-9]*')
);

CREATE INDEX idx_{phone}_contact ON {phone}(contact_id);
"#
    );

    Ok(sql)
}

/// Generates SQL to drop both tables, child before parent.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    let TableNames { contact, phone } = TableNames::new(prefix)?;

    let sql = format!(
        r#"
DROP TABLE IF EXISTS {phone};
DROP TABLE IF EXISTS {contact};
"#
    );

    Ok(sql)
}
