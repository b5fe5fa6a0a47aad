//! SQLite storage for the customer directory.
//!
//! This crate keeps contacts and their phone numbers in two related tables
//! and exposes them through write-through value objects.
//!
//! # Architecture
//!
//! - **`schema`**: DDL generation with customizable table prefixes
//! - **`verify`**: compares the expected layout with the live catalog
//! - **`migration`**: drop/create lifecycle of the two tables
//! - **`store`**: [`ContactStore`], the CRUD façade over one connection
//! - **`contact`**: [`Contact`] and [`PhoneRecord`] row projections
//!
//! # Quick start
//!
//! ```
//! use directory_sqlite::{ContactStore, SchemaStatus};
//!
//! let store = ContactStore::open_in_memory("").unwrap();
//! if store.verify_schema().unwrap() == SchemaStatus::NeedsCreation {
//!     store.create_schema().unwrap();
//! }
//!
//! let mut ana = store.add("Ana", "Lee", "a@x.com").unwrap();
//! ana.add_phone(&store, "+1 (202) 555-0143").unwrap();
//! assert!(ana.set_email(&store, "ana@x.com").unwrap().is_updated());
//!
//! let phones = ana.phones(&store).unwrap();
//! assert_eq!(phones[0].to_string(), "+1 (202) 555 01-43");
//! ```
//!
//! # Table prefix customization
//!
//! Table and index names are prefixed with a configurable string, allowing
//! several directories within the same SQLite database. Prefixes must
//! contain only alphanumeric characters and underscores; the empty prefix
//! yields the bare names `contact` and `contact_phone`.

mod contact;
mod error;
mod migration;
mod schema;
mod store;
mod verify;

pub use contact::{Contact, PhoneRecord, WriteOutcome};
pub use error::{Result, StoreError};
pub use migration::{Migration, MigrationStatus};
pub use schema::{TableNames, generate_drop_sql, generate_schema_sql};
pub use store::ContactStore;
pub use verify::{ColumnTriple, ExpectedSchema, SchemaStatus, SchemaVerifier, catalog_columns, diff};
