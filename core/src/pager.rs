//! Page arithmetic for paginated lists.
//!
//! Pages are 1-indexed. Items on a page are addressed by their
//! page-relative ordinal, also 1-indexed; [`Pager::resolve`] maps that
//! ordinal back to an index into the full list.
//!
//! # Examples
//!
//! ```
//! use directory_core::{PageToken, Pager};
//!
//! let pager = Pager::new(5, 12);
//! assert_eq!(pager.page_count(), 3);
//! assert_eq!(pager.bounds(2), 5..10);
//! assert_eq!(pager.prev(1), 1);
//! assert_eq!(pager.next(3), 3);
//! assert_eq!(pager.resolve(3, 2), Some(11));
//!
//! assert_eq!(PageToken::parse(">").unwrap(), PageToken::Next);
//! assert_eq!(PageToken::parse("3").unwrap(), PageToken::Pick(3));
//! ```

use std::ops::Range;

use thiserror::Error;

/// Errors raised when reading a navigation token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    /// Input is neither `<`, `>` nor a non-negative integer.
    #[error("invalid page selection: {0:?}")]
    InvalidToken(String),
}

/// A navigation token read from a paginated prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// `<`: previous page.
    Prev,
    /// `>`: next page.
    Next,
    /// `0`: leave the list.
    Exit,
    /// A page-relative ordinal, 1-based.
    Pick(usize),
}

impl PageToken {
    /// Parses a token, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PagerError::InvalidToken`] for anything other than `<`, `>`
    /// or a non-negative integer.
    pub fn parse(input: &str) -> Result<Self, PagerError> {
        match input.trim() {
            "<" => Ok(Self::Prev),
            ">" => Ok(Self::Next),
            other => match other.parse::<usize>() {
                Ok(0) => Ok(Self::Exit),
                Ok(n) => Ok(Self::Pick(n)),
                Err(_) => Err(PagerError::InvalidToken(input.to_string())),
            },
        }
    }
}

/// Page layout for `total` items split into pages of `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    total: usize,
}

impl Pager {
    /// Creates a pager. A page size of zero is treated as one.
    pub fn new(page_size: usize, total: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pages, `ceil(total / page_size)`; zero for an empty list.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Clamps `page` into `1..=page_count` (page 1 for an empty list).
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.page_count().max(1))
    }

    /// Index range of the items shown on `page`.
    pub fn bounds(&self, page: usize) -> Range<usize> {
        let start = (self.clamp(page) - 1) * self.page_size;
        let start = start.min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// Number of items shown on `page`.
    pub fn items_on_page(&self, page: usize) -> usize {
        self.bounds(page).len()
    }

    pub fn has_prev(&self, page: usize) -> bool {
        page > 1
    }

    pub fn has_next(&self, page: usize) -> bool {
        page < self.page_count()
    }

    /// Previous page, or `page` itself on the first page.
    pub fn prev(&self, page: usize) -> usize {
        if self.has_prev(page) { page - 1 } else { page }
    }

    /// Next page, or `page` itself on the last page.
    pub fn next(&self, page: usize) -> usize {
        if self.has_next(page) { page + 1 } else { page }
    }

    /// Maps a page-relative ordinal to an absolute item index.
    ///
    /// Returns `None` unless `ordinal` is in `1..=items_on_page(page)`.
    pub fn resolve(&self, page: usize, ordinal: usize) -> Option<usize> {
        let bounds = self.bounds(page);
        (1..=bounds.len())
            .contains(&ordinal)
            .then(|| bounds.start + ordinal - 1)
    }
}
