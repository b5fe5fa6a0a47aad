//! Opening the store and preparing its tables before the menus start.

use std::path::PathBuf;

use directory_sqlite::{ContactStore, SchemaStatus, StoreError};
use tracing::{info, warn};

use crate::config::DirectoryConfig;
use crate::console::Console;
use crate::menu::Result;

/// Opens the configured database, asking for another path while opening fails.
///
/// Returns `None` when the user answers with an empty path.
pub fn connect<C: Console>(config: &DirectoryConfig, console: &mut C) -> Result<Option<ContactStore>> {
    let mut path = config.database.clone();
    loop {
        match ContactStore::open(&path, config.table_prefix.as_str()) {
            Ok(store) => {
                info!(path = %path.display(), prefix = %config.table_prefix, "database opened");
                return Ok(Some(store));
            }
            Err(err @ StoreError::Connect { .. }) => {
                warn!(error = %err, "database connection failed");
                console.print(&err.to_string())?;
                let answer = console.prompt("Database file (empty to quit): ")?;
                let answer = answer.trim();
                if answer.is_empty() {
                    return Ok(None);
                }
                path = PathBuf::from(answer);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Makes sure the store's tables match the expected layout.
///
/// Offers to (re)create them when they do not. Returns `false` when the
/// user declines, in which case the session cannot continue.
pub fn ensure_schema<C: Console>(store: &ContactStore, console: &mut C) -> Result<bool> {
    match store.verify_schema()? {
        SchemaStatus::Compatible => Ok(true),
        SchemaStatus::NeedsCreation => {
            console.print("The database does not contain the expected tables.")?;
            if console.confirm("Create tables?")? {
                store.create_schema()?;
                console.print("Tables created.")?;
                Ok(true)
            } else {
                console.print("Cannot continue")?;
                Ok(false)
            }
        }
    }
}
