//! Accumulated search criteria.

use std::collections::BTreeMap;

use crate::field::FilterKey;
use crate::phone::{PhoneError, PhoneNumber};

/// A conjunctive set of search criteria keyed by [`FilterKey`].
///
/// Text values are kept as entered; the store lower-cases them for its
/// case-insensitive substring match. Phone values are stored as canonical
/// digits, so a malformed phone never becomes a criterion.
///
/// # Examples
///
/// ```
/// use directory_core::{FilterKey, SearchFilter};
///
/// let mut filter = SearchFilter::new();
/// assert!(filter.is_empty());
///
/// filter.set_raw(FilterKey::FirstName, "an").unwrap();
/// assert!(filter.set_raw(FilterKey::Phone, "not a phone").is_err());
/// assert_eq!(filter.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    criteria: BTreeMap<FilterKey, String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a criterion, returning the value it replaced.
    ///
    /// A phone value must already be a validated [`PhoneNumber`]; use
    /// [`set_raw`](Self::set_raw) for unvalidated input.
    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) -> Option<String> {
        self.criteria.insert(key, value.into())
    }

    /// Sets a criterion from raw user input, normalizing phone values.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::InvalidPhoneFormat`] for a phone value that does
    /// not parse; the filter is left unchanged.
    pub fn set_raw(&mut self, key: FilterKey, raw: &str) -> Result<Option<String>, PhoneError> {
        let value = Self::normalize(key, raw)?;
        Ok(self.set(key, value))
    }

    /// Normalizes raw input for `key` without storing it.
    pub fn normalize(key: FilterKey, raw: &str) -> Result<String, PhoneError> {
        match key {
            FilterKey::Phone => PhoneNumber::parse(raw).map(PhoneNumber::into_digits),
            _ => Ok(raw.to_string()),
        }
    }

    /// Sets the phone criterion from an already validated number.
    pub fn set_phone(&mut self, phone: &PhoneNumber) -> Option<String> {
        self.set(FilterKey::Phone, phone.digits())
    }

    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.criteria.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.criteria.contains_key(&key)
    }

    pub fn remove(&mut self, key: FilterKey) -> Option<String> {
        self.criteria.remove(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Iterates criteria in [`FilterKey`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.criteria.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl FromIterator<(FilterKey, String)> for SearchFilter {
    fn from_iter<T: IntoIterator<Item = (FilterKey, String)>>(iter: T) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_value() {
        let mut filter = SearchFilter::new();
        assert_eq!(filter.set(FilterKey::LastName, "Lee"), None);
        assert_eq!(filter.set(FilterKey::LastName, "Li"), Some("Lee".to_string()));
        assert_eq!(filter.get(FilterKey::LastName), Some("Li"));
    }

    #[test]
    fn test_phone_values_are_normalized() {
        let mut filter = SearchFilter::new();
        filter.set_raw(FilterKey::Phone, "+1 (202) 555-0143").unwrap();
        assert_eq!(filter.get(FilterKey::Phone), Some("12025550143"));
    }

    #[test]
    fn test_invalid_phone_leaves_filter_unchanged() {
        let mut filter = SearchFilter::new();
        filter.set_raw(FilterKey::Phone, "12025550143").unwrap();
        let err = filter.set_raw(FilterKey::Phone, "555").unwrap_err();
        assert!(matches!(err, PhoneError::InvalidPhoneFormat(_)));
        assert_eq!(filter.get(FilterKey::Phone), Some("12025550143"));
    }

    #[test]
    fn test_text_values_are_kept_verbatim() {
        let mut filter = SearchFilter::new();
        filter.set_raw(FilterKey::Email, "  A@X.com").unwrap();
        assert_eq!(filter.get(FilterKey::Email), Some("  A@X.com"));
    }

    #[test]
    fn test_iteration_follows_key_order() {
        let filter: SearchFilter = [
            (FilterKey::Phone, "12025550143".to_string()),
            (FilterKey::FirstName, "an".to_string()),
            (FilterKey::Email, "x.com".to_string()),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = filter.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![FilterKey::FirstName, FilterKey::Email, FilterKey::Phone]);
    }
}
