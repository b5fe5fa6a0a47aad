//! Interactive menus over a [`ContactStore`](directory_sqlite::ContactStore).
//!
//! [`state`] holds the pure state machine: a [`MenuState`] plus one line of
//! input yields an [`Action`]. [`controller`] performs the actions that need
//! more prompts or store access and feeds the resulting state back in.

mod controller;
mod state;

pub use controller::MenuController;
pub use state::{Action, Listing, MenuState, PageStep, PhoneIntent, transition};

use std::io;

use directory_core::PagerError;
use directory_sqlite::StoreError;
use thiserror::Error;

/// Errors that end a menu interaction.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Input where a menu number or page token was required.
    #[error("invalid menu choice: {0:?}")]
    InvalidChoice(String),

    /// Input ended while a prompt was waiting.
    #[error("input closed")]
    InputClosed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for MenuError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::InputClosed
        } else {
            Self::Io(err)
        }
    }
}

impl From<PagerError> for MenuError {
    fn from(err: PagerError) -> Self {
        match err {
            PagerError::InvalidToken(input) => Self::InvalidChoice(input),
        }
    }
}

/// Result type for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Parses a numeric menu choice, ignoring surrounding whitespace.
pub(crate) fn parse_choice(input: &str) -> Result<u32> {
    input
        .trim()
        .parse()
        .map_err(|_| MenuError::InvalidChoice(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(" 2 ").unwrap(), 2);
        assert!(matches!(parse_choice("two"), Err(MenuError::InvalidChoice(s)) if s == "two"));
        assert!(matches!(parse_choice("-1"), Err(MenuError::InvalidChoice(_))));
        assert!(matches!(parse_choice(""), Err(MenuError::InvalidChoice(_))));
    }

    #[test]
    fn test_eof_maps_to_input_closed() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "closed");
        assert!(matches!(MenuError::from(eof), MenuError::InputClosed));

        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        assert!(matches!(MenuError::from(broken), MenuError::Io(_)));
    }
}
