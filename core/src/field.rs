//! Closed sets of contact columns.
//!
//! Only the names produced by [`ContactField::column`] and
//! [`FilterKey::column`] are ever interpolated into SQL text; every value
//! travels as a bound parameter.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised when resolving a field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Phone numbers live in their own table and have a dedicated update path.
    #[error("phone numbers must be changed through the dedicated phone update")]
    PhoneRequiresDedicatedPath,
    /// The name does not refer to any contact column.
    #[error("unknown contact field: {0}")]
    Unknown(String),
}

/// A directly updatable column of the contact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
}

impl ContactField {
    /// All updatable fields in menu order.
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::Email];

    /// Column name in the contact table.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "e-mail",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for ContactField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_name" => Ok(Self::FirstName),
            "last_name" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "phone" => Err(FieldError::PhoneRequiresDedicatedPath),
            other => Err(FieldError::Unknown(other.to_string())),
        }
    }
}

/// A searchable attribute of a contact.
///
/// Ordering follows the search menu, which keeps [`SearchFilter`]
/// iteration (and therefore generated SQL) deterministic.
///
/// [`SearchFilter`]: crate::SearchFilter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl FilterKey {
    /// All filter keys in menu order.
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Phone];

    /// Column name, unqualified.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Human-readable label used in the search menu.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "e-mail",
            Self::Phone => "phone number",
        }
    }

    /// Returns the matching contact column for text keys, `None` for phone.
    pub fn contact_field(self) -> Option<ContactField> {
        match self {
            Self::FirstName => Some(ContactField::FirstName),
            Self::LastName => Some(ContactField::LastName),
            Self::Email => Some(ContactField::Email),
            Self::Phone => None,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for FilterKey {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone" => Ok(Self::Phone),
            other => other.parse::<ContactField>().map(|field| match field {
                ContactField::FirstName => Self::FirstName,
                ContactField::LastName => Self::LastName,
                ContactField::Email => Self::Email,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_field_round_trips_through_column_name() {
        for field in ContactField::ALL {
            assert_eq!(field.column().parse::<ContactField>().unwrap(), field);
        }
    }

    #[test]
    fn test_phone_is_not_a_contact_field() {
        assert_eq!(
            "phone".parse::<ContactField>(),
            Err(FieldError::PhoneRequiresDedicatedPath)
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert_eq!(
            "id; DROP TABLE contact".parse::<ContactField>(),
            Err(FieldError::Unknown("id; DROP TABLE contact".to_string()))
        );
        assert!("nickname".parse::<FilterKey>().is_err());
    }

    #[test]
    fn test_filter_key_parsing() {
        for key in FilterKey::ALL {
            assert_eq!(key.column().parse::<FilterKey>().unwrap(), key);
        }
        assert_eq!(FilterKey::Phone.contact_field(), None);
        assert_eq!(FilterKey::Email.contact_field(), Some(ContactField::Email));
    }
}
