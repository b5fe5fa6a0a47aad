//! Core domain types for the customer directory.
//!
//! This crate holds the pieces of the directory that never touch the
//! database:
//!
//! - [`PhoneNumber`]: normalizes free-form phone input into canonical
//!   digits and renders it for display.
//! - [`is_valid_email`]: the e-mail shape check applied by the console.
//! - [`ContactField`] and [`FilterKey`]: closed sets of the contact columns
//!   that may be updated or searched.
//! - [`SearchFilter`]: an accumulated, conjunctive set of search criteria.
//! - [`Pager`]: page arithmetic shared by every paginated list.
//!
//! # Example
//!
//! ```
//! use directory_core::{FilterKey, Pager, PhoneNumber, SearchFilter};
//!
//! let phone = PhoneNumber::parse("+7 (912) 345-67-89").unwrap();
//! assert_eq!(phone.digits(), "79123456789");
//! assert_eq!(phone.to_string(), "+7 (912) 345 67-89");
//!
//! let mut filter = SearchFilter::new();
//! filter.set_raw(FilterKey::Phone, "7-912-345-67-89").unwrap();
//! assert_eq!(filter.get(FilterKey::Phone), Some("79123456789"));
//!
//! let pager = Pager::new(5, 12);
//! assert_eq!(pager.page_count(), 3);
//! assert_eq!(pager.bounds(3), 10..12);
//! ```

mod email;
mod field;
mod filter;
mod pager;
mod phone;

pub use email::is_valid_email;
pub use field::{ContactField, FieldError, FilterKey};
pub use filter::SearchFilter;
pub use pager::{PageToken, Pager, PagerError};
pub use phone::{PhoneError, PhoneNumber, format_digits};
