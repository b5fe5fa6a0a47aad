//! Write-through value objects for contacts and phone numbers.
//!
//! A [`Contact`] caches the last known column values of one contact row.
//! Its mutators persist first and only touch the cache once the store
//! confirms the row was affected, so a contact never shows a value the
//! database does not hold. Once removed, a contact has no id and every
//! mutator fails with [`StoreError::ContactDeleted`].

use std::fmt;

use directory_core::{ContactField, PhoneNumber};

use crate::error::{Result, StoreError};
use crate::store::ContactStore;

/// Result of a write that targets an existing row.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row was written.
    Updated,
    /// No matching row exists; nothing changed.
    NotFound,
}

impl WriteOutcome {
    pub fn is_updated(self) -> bool {
        matches!(self, Self::Updated)
    }
}

impl From<bool> for WriteOutcome {
    fn from(affected: bool) -> Self {
        if affected { Self::Updated } else { Self::NotFound }
    }
}

/// A projection of one contact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    email: String,
}

impl Contact {
    /// Builds a contact for a row that exists with the given id.
    pub fn new(
        id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Store id, or `None` once the contact has been removed.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_deleted(&self) -> bool {
        self.id.is_none()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Cached value of `field`.
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
        }
    }

    fn live_id(&self) -> Result<i64> {
        self.id.ok_or(StoreError::ContactDeleted)
    }

    /// Persists `value` into `field`, then updates the cached value.
    ///
    /// On [`WriteOutcome::NotFound`] the cache is left as it was.
    pub fn set(
        &mut self,
        store: &ContactStore,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<WriteOutcome> {
        let id = self.live_id()?;
        let value = value.into();
        let outcome = WriteOutcome::from(store.update(id, field, &value)?);
        if outcome.is_updated() {
            match field {
                ContactField::FirstName => self.first_name = value,
                ContactField::LastName => self.last_name = value,
                ContactField::Email => self.email = value,
            }
        }
        Ok(outcome)
    }

    pub fn set_first_name(
        &mut self,
        store: &ContactStore,
        value: impl Into<String>,
    ) -> Result<WriteOutcome> {
        self.set(store, ContactField::FirstName, value)
    }

    pub fn set_last_name(
        &mut self,
        store: &ContactStore,
        value: impl Into<String>,
    ) -> Result<WriteOutcome> {
        self.set(store, ContactField::LastName, value)
    }

    pub fn set_email(&mut self, store: &ContactStore, value: impl Into<String>) -> Result<WriteOutcome> {
        self.set(store, ContactField::Email, value)
    }

    /// Loads the contact's phone numbers.
    pub fn phones(&self, store: &ContactStore) -> Result<Vec<PhoneRecord>> {
        store.list_phones(self.live_id()?)
    }

    /// Validates and stores a new phone number for this contact.
    pub fn add_phone(&self, store: &ContactStore, raw: &str) -> Result<PhoneRecord> {
        store.add_phone(self.live_id()?, raw)
    }

    /// Replaces the number of one of this contact's phones.
    ///
    /// `raw` is validated before anything is written. A phone that belongs
    /// to another contact yields [`WriteOutcome::NotFound`].
    pub fn change_phone(
        &self,
        store: &ContactStore,
        phone: &PhoneRecord,
        raw: &str,
    ) -> Result<WriteOutcome> {
        let id = self.live_id()?;
        let number = PhoneNumber::parse(raw)?;
        if phone.contact_id() != id {
            return Ok(WriteOutcome::NotFound);
        }
        Ok(store.update_phone(phone.id(), &number)?.into())
    }

    /// Removes one of this contact's phones.
    pub fn remove_phone(&self, store: &ContactStore, phone: &PhoneRecord) -> Result<WriteOutcome> {
        Ok(store.remove_phone(self.live_id()?, Some(phone.id()))?.into())
    }

    /// Removes the contact and its phones, clearing this projection on success.
    pub fn remove(&mut self, store: &ContactStore) -> Result<WriteOutcome> {
        let outcome = WriteOutcome::from(store.remove(self.live_id()?)?);
        if outcome.is_updated() {
            self.id = None;
            self.first_name.clear();
            self.last_name.clear();
            self.email.clear();
        }
        Ok(outcome)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.first_name, self.last_name, self.email)
    }
}

/// One stored phone number.
///
/// The owning contact is referenced by id and looked up on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRecord {
    id: i64,
    number: PhoneNumber,
    contact_id: i64,
}

impl PhoneRecord {
    pub fn new(id: i64, number: PhoneNumber, contact_id: i64) -> Self {
        Self {
            id,
            number,
            contact_id,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    pub fn contact_id(&self) -> i64 {
        self.contact_id
    }

    /// Looks up the contact this phone belongs to.
    pub fn owner(&self, store: &ContactStore) -> Result<Option<Contact>> {
        store.get(self.contact_id)
    }
}

impl fmt::Display for PhoneRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.number, f)
    }
}
