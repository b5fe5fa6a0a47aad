//! Schema compatibility checks against the live SQLite catalog.
//!
//! [`diff`] compares an [`ExpectedSchema`] with the column metadata SQLite
//! reports for the same tables. The check is advisory: a mismatch only
//! tells the caller the tables are absent or shaped differently, and
//! recreating them is left to [`Migration::recreate`](crate::Migration::recreate).
//!
//! # Example
//!
//! ```
//! use directory_sqlite::{ExpectedSchema, diff};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let expected = ExpectedSchema::new().table("note", &[("id", "integer"), ("body", "text")]);
//!
//! assert!(diff(&conn, &expected).unwrap());
//! conn.execute_batch("CREATE TABLE note (id INTEGER, body TEXT)").unwrap();
//! assert!(!diff(&conn, &expected).unwrap());
//! ```

use std::collections::HashSet;

use rusqlite::{Connection, params_from_iter};
use tracing::{debug, warn};

use crate::error::Result;
use crate::schema::TableNames;

/// A `(table, column, declared type)` triple.
pub type ColumnTriple = (String, String, String);

/// Expected tables and their columns, in declaration order.
///
/// Declared types are compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedSchema {
    tables: Vec<(String, Vec<(String, String)>)>,
}

impl ExpectedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table with its `(column, type)` pairs.
    pub fn table(mut self, name: impl Into<String>, columns: &[(&str, &str)]) -> Self {
        let columns = columns
            .iter()
            .map(|(column, ty)| ((*column).to_string(), ty.to_lowercase()))
            .collect();
        self.tables.push((name.into(), columns));
        self
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Flattens the expectation into `(table, column, type)` triples.
    pub fn triples(&self) -> Vec<ColumnTriple> {
        self.tables
            .iter()
            .flat_map(|(table, columns)| {
                columns
                    .iter()
                    .map(move |(column, ty)| (table.clone(), column.clone(), ty.clone()))
            })
            .collect()
    }
}

/// Reads column metadata for the named tables from the SQLite catalog.
///
/// Types are lower-cased. Tables that do not exist contribute no rows.
pub fn catalog_columns<'t>(
    conn: &Connection,
    tables: impl IntoIterator<Item = &'t str>,
) -> Result<Vec<ColumnTriple>> {
    let tables: Vec<&str> = tables.into_iter().collect();
    if tables.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=tables.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT m.name, p.name, lower(p.type)
         FROM sqlite_master AS m
         JOIN pragma_table_info(m.name) AS p
         WHERE m.type = 'table' AND m.name IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(tables.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<std::result::Result<Vec<ColumnTriple>, _>>()?;
    Ok(rows)
}

/// Compares `expected` with the live catalog.
///
/// Returns `true` when the schema does not match: the tables are absent,
/// the catalog reports a column the expectation does not declare, or an
/// expected column is missing. An empty expectation never mismatches.
pub fn diff(conn: &Connection, expected: &ExpectedSchema) -> Result<bool> {
    if expected.is_empty() {
        return Ok(false);
    }

    let catalog = catalog_columns(conn, expected.table_names())?;
    if catalog.is_empty() {
        debug!("expected tables are absent from the catalog");
        return Ok(true);
    }

    let triples = expected.triples();
    let mut satisfied = HashSet::with_capacity(triples.len());
    for column in &catalog {
        match triples.iter().position(|triple| triple == column) {
            Some(index) => {
                satisfied.insert(index);
            }
            None => {
                debug!(table = %column.0, column = %column.1, ty = %column.2, "undeclared column");
                return Ok(true);
            }
        }
    }

    let mismatch = satisfied.len() != triples.len();
    if mismatch {
        debug!(
            expected = triples.len(),
            found = satisfied.len(),
            "expected columns are missing"
        );
    }
    Ok(mismatch)
}

/// Outcome of a directory schema check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Tables exist with exactly the expected columns.
    Compatible,
    /// Tables are missing or differ; they must be (re)created before use.
    NeedsCreation,
}

/// Checks the directory tables for a given prefix.
#[derive(Debug, Clone)]
pub struct SchemaVerifier {
    expected: ExpectedSchema,
}

impl SchemaVerifier {
    /// Builds the expectation set for the directory tables under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPrefix`](crate::StoreError::InvalidPrefix)
    /// for an invalid prefix.
    pub fn new(prefix: &str) -> Result<Self> {
        let names = TableNames::new(prefix)?;
        let expected = ExpectedSchema::new()
            .table(
                names.contact,
                &[
                    ("id", "integer"),
                    ("first_name", "text"),
                    ("last_name", "text"),
                    ("email", "text"),
                ],
            )
            .table(
                names.phone,
                &[("id", "integer"), ("contact_id", "integer"), ("phone", "text")],
            );
        Ok(Self { expected })
    }

    pub fn expected(&self) -> &ExpectedSchema {
        &self.expected
    }

    /// Runs [`diff`] for the directory tables.
    pub fn check(&self, conn: &Connection) -> Result<SchemaStatus> {
        if diff(conn, &self.expected)? {
            warn!("directory tables are missing or do not match the expected layout");
            Ok(SchemaStatus::NeedsCreation)
        } else {
            Ok(SchemaStatus::Compatible)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::generate_schema_sql;

    fn note_schema() -> ExpectedSchema {
        ExpectedSchema::new().table("note", &[("id", "INTEGER"), ("body", "TEXT")])
    }

    #[test]
    fn test_triples_flatten_in_order() {
        let expected = note_schema().table("tag", &[("name", "text")]);
        assert_eq!(
            expected.triples(),
            vec![
                ("note".into(), "id".into(), "integer".into()),
                ("note".into(), "body".into(), "text".into()),
                ("tag".into(), "name".into(), "text".into()),
            ]
        );
    }

    #[test]
    fn test_absent_tables_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_exact_match() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE note (id INTEGER, body TEXT)").unwrap();
        assert!(!diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_extra_column_mismatches() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE note (id INTEGER, body TEXT, title TEXT)")
            .unwrap();
        assert!(diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_missing_column_mismatches() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE note (id INTEGER)").unwrap();
        assert!(diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_wrong_type_mismatches() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE note (id INTEGER, body BLOB)").unwrap();
        assert!(diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_missing_second_table_mismatches() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE note (id INTEGER, body TEXT)").unwrap();
        let expected = note_schema().table("tag", &[("name", "text")]);
        assert!(diff(&conn, &expected).unwrap());
    }

    #[test]
    fn test_unrelated_tables_are_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE note (id INTEGER, body TEXT); CREATE TABLE other (x BLOB);",
        )
        .unwrap();
        assert!(!diff(&conn, &note_schema()).unwrap());
    }

    #[test]
    fn test_empty_expectation_never_mismatches() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!diff(&conn, &ExpectedSchema::new()).unwrap());
    }

    #[test]
    fn test_verifier_accepts_generated_schema() {
        let conn = Connection::open_in_memory().unwrap();
        let verifier = SchemaVerifier::new("crm_").unwrap();
        assert_eq!(verifier.check(&conn).unwrap(), SchemaStatus::NeedsCreation);

        conn.execute_batch(&generate_schema_sql("crm_").unwrap()).unwrap();
        assert_eq!(verifier.check(&conn).unwrap(), SchemaStatus::Compatible);

        // Same tables under another prefix are not ours.
        let other = SchemaVerifier::new("other_").unwrap();
        assert_eq!(other.check(&conn).unwrap(), SchemaStatus::NeedsCreation);
    }
}
