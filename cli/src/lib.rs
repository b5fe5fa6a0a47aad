//! Interactive console for the customer directory.
//!
//! The `customers` binary wires these pieces together: [`config`] resolves
//! settings, [`startup`] opens the store and prepares its tables, and
//! [`menu`] runs the menus over a [`console::Console`].

pub mod config;
pub mod console;
pub mod menu;
pub mod startup;

pub use config::{ConfigError, DirectoryConfig};
pub use console::{Console, TextConsole};
pub use menu::{MenuController, MenuError, MenuState};
