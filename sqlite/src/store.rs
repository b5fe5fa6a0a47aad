//! CRUD access to contacts and their phone numbers.
//!
//! [`ContactStore`] owns the single SQLite connection the application uses
//! for its whole lifetime. Every operation runs one parameterized statement,
//! or one explicit transaction when it touches both tables, and commits
//! before returning. Statements that fail leave the tables unchanged.
//!
//! Operations that target a row by id report whether the row was affected
//! instead of failing, so a stale id is a `false`, not an error.
//!
//! # Example
//!
//! ```
//! use directory_core::{FilterKey, SearchFilter};
//! use directory_sqlite::ContactStore;
//!
//! let store = ContactStore::open_in_memory("").unwrap();
//! store.create_schema().unwrap();
//!
//! let ana = store.add("Ana", "Lee", "a@x.com").unwrap();
//! let id = ana.id().unwrap();
//! store.add_phone(id, "+1 (202) 555-0143").unwrap();
//!
//! let mut filter = SearchFilter::new();
//! filter.set(FilterKey::FirstName, "an");
//! assert_eq!(store.find(&filter).unwrap(), vec![ana]);
//!
//! assert!(store.remove(id).unwrap());
//! assert!(store.find(&filter).unwrap().is_empty());
//! ```

use std::path::Path;

use directory_core::{ContactField, FilterKey, PhoneNumber, SearchFilter};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, info};

use crate::contact::{Contact, PhoneRecord};
use crate::error::{Result, StoreError};
use crate::migration::{Migration, MigrationStatus};
use crate::schema::TableNames;
use crate::verify::{SchemaStatus, SchemaVerifier};

/// SQL function that lowercases text by Unicode rules. SQLite's built-in
/// `LOWER` only folds ASCII letters.
const LOWER_FN: &str = "directory_lower";

/// Store façade over the contact and contact phone tables.
pub struct ContactStore {
    conn: Connection,
    prefix: String,
    tables: TableNames,
}

impl ContactStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// The connection is probed with a catalog read, so a file that is not a
    /// SQLite database fails here rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connect`] if the database cannot be opened or
    /// read, or [`StoreError::InvalidPrefix`] for an invalid prefix.
    pub fn open(path: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let connect_err = |source: rusqlite::Error| StoreError::Connect {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(connect_err)?;
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connect_err)?;
        debug!(path = %path.display(), "opened directory database");
        Self::from_connection(conn, prefix)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(prefix: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Connect {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn, prefix)
    }

    /// Wraps an existing connection, enabling foreign key enforcement on it
    /// and registering the Unicode lowercase function used by [`find`](Self::find).
    pub fn from_connection(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let tables = TableNames::new(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.create_scalar_function(
            LOWER_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        Ok(Self {
            conn,
            prefix,
            tables,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| StoreError::DatabaseError(e))
    }

    /// Compares the live tables with the layout this store expects.
    pub fn verify_schema(&self) -> Result<SchemaStatus> {
        SchemaVerifier::new(&self.prefix)?.check(&self.conn)
    }

    /// Drops and recreates both tables. Every stored row is lost.
    pub fn create_schema(&self) -> Result<()> {
        Migration::new(&self.conn, self.prefix.as_str())?.recreate()
    }

    /// Reports table presence and row counts.
    pub fn status(&self) -> Result<MigrationStatus> {
        Migration::new(&self.conn, self.prefix.as_str())?.status()
    }

    /// Inserts a contact and returns it with its assigned id.
    pub fn add(&self, first_name: &str, last_name: &str, email: &str) -> Result<Contact> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (first_name, last_name, email) VALUES (?1, ?2, ?3)",
                self.tables.contact
            ),
            params![first_name, last_name, email],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(contact_id = id, "contact added");
        Ok(Contact::new(id, first_name, last_name, email))
    }

    /// Loads a single contact by id.
    pub fn get(&self, contact_id: i64) -> Result<Option<Contact>> {
        let contact = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, first_name, last_name, email FROM {} WHERE id = ?1",
                    self.tables.contact
                ),
                [contact_id],
                contact_from_row,
            )
            .optional()?;
        Ok(contact)
    }

    /// Updates one contact column. Returns whether the row was affected.
    pub fn update(&self, contact_id: i64, field: ContactField, value: &str) -> Result<bool> {
        let rows = self.conn.execute(
            &format!(
                "UPDATE {} SET {} = ?1 WHERE id = ?2",
                self.tables.contact,
                field.column()
            ),
            params![value, contact_id],
        )?;
        debug!(contact_id, field = %field, rows, "contact updated");
        Ok(rows == 1)
    }

    /// Updates a contact column named by string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Field`] for `phone`, which has its own update
    /// path, and for names that are not contact columns.
    pub fn update_named(&self, contact_id: i64, field: &str, value: &str) -> Result<bool> {
        let field: ContactField = field.parse()?;
        self.update(contact_id, field, value)
    }

    /// Replaces the number stored in one phone row.
    pub fn update_phone(&self, phone_id: i64, number: &PhoneNumber) -> Result<bool> {
        let rows = self.conn.execute(
            &format!("UPDATE {} SET phone = ?1 WHERE id = ?2", self.tables.phone),
            params![number.digits(), phone_id],
        )?;
        debug!(phone_id, rows, "phone updated");
        Ok(rows == 1)
    }

    /// Validates `raw` and stores it as a new phone number of the contact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPhone`] before touching the database when
    /// `raw` does not parse, and [`StoreError::ContactNotFound`] when the
    /// contact does not exist.
    pub fn add_phone(&self, contact_id: i64, raw: &str) -> Result<PhoneRecord> {
        let number = PhoneNumber::parse(raw)?;
        if !self.contact_exists(contact_id)? {
            return Err(StoreError::ContactNotFound(contact_id));
        }
        self.conn.execute(
            &format!(
                "INSERT INTO {} (contact_id, phone) VALUES (?1, ?2)",
                self.tables.phone
            ),
            params![contact_id, number.digits()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(contact_id, phone_id = id, "phone added");
        Ok(PhoneRecord::new(id, number, contact_id))
    }

    /// Lists the phone numbers of a contact in store order.
    pub fn list_phones(&self, contact_id: i64) -> Result<Vec<PhoneRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, phone, contact_id FROM {} WHERE contact_id = ?1",
            self.tables.phone
        ))?;
        let phones = stmt
            .query_map([contact_id], phone_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(phones)
    }

    /// Lists every contact in store order.
    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, first_name, last_name, email FROM {}",
            self.tables.contact
        ))?;
        let contacts = stmt
            .query_map([], contact_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    /// Finds contacts matching every criterion of `filter`.
    ///
    /// Text criteria are case-insensitive substring matches; the phone
    /// criterion must equal a stored number exactly. An empty filter returns
    /// all contacts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPhone`] if the phone criterion is not a
    /// valid phone number.
    pub fn find(&self, filter: &SearchFilter) -> Result<Vec<Contact>> {
        let mut conditions = Vec::with_capacity(filter.len());
        let mut values: Vec<String> = Vec::with_capacity(filter.len());
        let mut join_phone = false;

        for (key, value) in filter.iter() {
            let param = values.len() + 1;
            match key {
                FilterKey::Phone => {
                    join_phone = true;
                    conditions.push(format!("p.phone = ?{param}"));
                    values.push(PhoneNumber::parse(value)?.into_digits());
                }
                _ => {
                    conditions.push(format!(
                        "{LOWER_FN}(c.{}) LIKE ?{param} ESCAPE '\\'",
                        key.column()
                    ));
                    values.push(format!("%{}%", escape_like(&value.to_lowercase())));
                }
            }
        }

        let mut sql = format!(
            "SELECT DISTINCT c.id, c.first_name, c.last_name, c.email FROM {} AS c",
            self.tables.contact
        );
        if join_phone {
            sql.push_str(&format!(
                " JOIN {} AS p ON p.contact_id = c.id",
                self.tables.phone
            ));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY c.id");
        debug!(criteria = filter.len(), join_phone, "searching contacts");

        let mut stmt = self.conn.prepare(&sql)?;
        let contacts = stmt
            .query_map(params_from_iter(values.iter()), contact_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    /// Removes a contact together with all of its phone numbers.
    ///
    /// Phone rows go first, then the contact row, inside one transaction.
    /// Returns `false` and changes nothing when the contact does not exist.
    pub fn remove(&self, contact_id: i64) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let phones = tx.execute(
            &format!("DELETE FROM {} WHERE contact_id = ?1", self.tables.phone),
            [contact_id],
        )?;
        let rows = tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", self.tables.contact),
            [contact_id],
        )?;
        if rows != 1 {
            // Dropping the transaction rolls it back.
            return Ok(false);
        }
        tx.commit()?;
        info!(contact_id, phones, "contact removed");
        Ok(true)
    }

    /// Removes one phone of a contact, or all of them when `phone_id` is `None`.
    ///
    /// A specific phone is only removed if it belongs to `contact_id`.
    /// Returns whether any row was removed.
    pub fn remove_phone(&self, contact_id: i64, phone_id: Option<i64>) -> Result<bool> {
        let rows = match phone_id {
            Some(phone_id) => self.conn.execute(
                &format!(
                    "DELETE FROM {} WHERE contact_id = ?1 AND id = ?2",
                    self.tables.phone
                ),
                params![contact_id, phone_id],
            )?,
            None => self.conn.execute(
                &format!("DELETE FROM {} WHERE contact_id = ?1", self.tables.phone),
                [contact_id],
            )?,
        };
        debug!(contact_id, ?phone_id, rows, "phones removed");
        Ok(rows > 0)
    }

    fn contact_exists(&self, contact_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE id = ?1", self.tables.contact),
            [contact_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Escapes LIKE wildcards so user input matches literally under `ESCAPE '\'`.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact::new(
        row.get(0)?,
        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    ))
}

fn phone_from_row(row: &Row<'_>) -> rusqlite::Result<PhoneRecord> {
    let digits: String = row.get(1)?;
    let number = PhoneNumber::parse(&digits).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PhoneRecord::new(row.get(0)?, number, row.get(2)?))
}
