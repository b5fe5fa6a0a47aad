//! Phone number normalization and display formatting.
//!
//! A [`PhoneNumber`] always holds canonical digits: one or two country-code
//! digits followed by exactly ten subscriber digits, with no separators.
//! [`PhoneNumber::parse`] is the only way to build one, so every phone value
//! that reaches storage has been through the same validation gate.
//!
//! # Examples
//!
//! ```
//! use directory_core::PhoneNumber;
//!
//! let phone = PhoneNumber::parse("+38 (050) 123-45-67").unwrap();
//! assert_eq!(phone.digits(), "380501234567");
//! assert_eq!(phone.format(), "+38 (050) 123 45-67");
//!
//! assert!(PhoneNumber::parse("123-45").is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}[0-9]{10}$").expect("static regex must compile"));

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static regex must compile"));

static DISPLAY_GROUPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})([0-9]{3})([0-9]{3})([0-9]{2})([0-9]{2})$").expect("static regex must compile")
});

/// Phone validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    /// The input does not reduce to 11 or 12 digits.
    #[error("invalid phone number format: {0:?}")]
    InvalidPhoneFormat(String),
}

/// A validated phone number in canonical digit form.
///
/// Serializes as the bare digit string; deserialization runs the same
/// validation as [`PhoneNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses free-form phone input into canonical digits.
    ///
    /// Input that is already canonical is kept as is. Anything else has every
    /// non-digit character stripped and is validated again.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::InvalidPhoneFormat`] when the stripped input is
    /// not 1-2 digits followed by exactly 10 digits.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        if CANONICAL.is_match(raw) {
            return Ok(Self(raw.to_string()));
        }
        let digits = NON_DIGIT.replace_all(raw, "");
        if !CANONICAL.is_match(&digits) {
            return Err(PhoneError::InvalidPhoneFormat(raw.to_string()));
        }
        Ok(Self(digits.into_owned()))
    }

    /// Returns the canonical digit string.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Renders the number as `+CC (AAA) BBB CC-DD`.
    pub fn format(&self) -> String {
        // Canonical digits always match the display groups.
        format_digits(&self.0).unwrap_or_else(|| self.0.clone())
    }

    /// Consumes the number and returns the canonical digit string.
    pub fn into_digits(self) -> String {
        self.0
    }
}

/// Formats an arbitrary digit string for display.
///
/// Returns `None` when the string is not in canonical form.
///
/// # Examples
///
/// ```
/// use directory_core::format_digits;
///
/// assert_eq!(format_digits("12025550143").as_deref(), Some("+1 (202) 555 01-43"));
/// assert_eq!(format_digits("555-0143"), None);
/// ```
pub fn format_digits(digits: &str) -> Option<String> {
    DISPLAY_GROUPS
        .is_match(digits)
        .then(|| {
            DISPLAY_GROUPS
                .replace(digits, "+$1 ($2) $3 $4-$5")
                .into_owned()
        })
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_display_shape(s: &str) -> bool {
        Regex::new(r"^\+\d{1,2} \(\d{3}\) \d{3} \d{2}-\d{2}$")
            .unwrap()
            .is_match(s)
    }

    #[test]
    fn test_canonical_input_is_unchanged() {
        assert_eq!(PhoneNumber::parse("79123456789").unwrap().digits(), "79123456789");
        assert_eq!(PhoneNumber::parse("380501234567").unwrap().digits(), "380501234567");
    }

    #[test]
    fn test_separators_are_stripped() {
        let cases = [
            ("+7 (912) 345-67-89", "79123456789"),
            ("+1 202 555 0143", "12025550143"),
            ("38.050.123.45.67", "380501234567"),
            ("tel: 8-800-555-35-35", "88005553535"),
        ];
        for (raw, expected) in cases {
            assert_eq!(PhoneNumber::parse(raw).unwrap().digits(), expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        for raw in ["+7 (912) 345-67-89", "12025550143", "+38 050 123 45 67"] {
            let once = PhoneNumber::parse(raw).unwrap();
            let twice = PhoneNumber::parse(once.digits()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_wrong_digit_count_is_rejected() {
        for raw in ["", "abc", "123", "5550143", "2025550143", "1234567890123", "+1 (202) 555-01"] {
            assert_eq!(
                PhoneNumber::parse(raw),
                Err(PhoneError::InvalidPhoneFormat(raw.to_string())),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(PhoneNumber::parse("79123456789").unwrap().format(), "+7 (912) 345 67-89");
        assert_eq!(PhoneNumber::parse("380501234567").unwrap().format(), "+38 (050) 123 45-67");
        for raw in ["+1 202 555 0143", "44 20 7946 0958", "(380) 50-123-4567"] {
            let formatted = PhoneNumber::parse(raw).unwrap().to_string();
            assert!(is_display_shape(&formatted), "{formatted:?}");
        }
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        // Arabic-Indic digits are Unicode decimal digits but not canonical.
        assert!(PhoneNumber::parse("٧٩١٢٣٤٥٦٧٨٩").is_err());
    }

    #[test]
    fn test_format_digits_rejects_non_canonical() {
        assert_eq!(format_digits("+7 912"), None);
        assert_eq!(format_digits("123"), None);
        assert_eq!(format_digits("1234567890123"), None);
    }

    #[test]
    fn test_from_str_and_try_from() {
        let parsed: PhoneNumber = "+1 202 555 0143".parse().unwrap();
        assert_eq!(parsed.as_ref(), "12025550143");
        assert!(PhoneNumber::try_from("nope").is_err());
        assert_eq!(String::from(parsed), "12025550143");
    }

    #[test]
    fn test_deserialize_validates() {
        let phone: PhoneNumber = serde_yaml::from_str("\"+7 912 345 67 89\"").unwrap();
        assert_eq!(phone.digits(), "79123456789");
        assert!(serde_yaml::from_str::<PhoneNumber>("\"12\"").is_err());
        let yaml = serde_yaml::to_string(&phone).unwrap();
        assert_eq!(serde_yaml::from_str::<PhoneNumber>(&yaml).unwrap(), phone);
    }
}
