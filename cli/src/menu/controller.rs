//! Drives [`MenuState`]s against a console and a store.

use directory_core::{ContactField, FilterKey, PhoneNumber, SearchFilter, is_valid_email};
use directory_sqlite::{Contact, ContactStore, PhoneRecord, StoreError};
use tracing::debug;

use super::state::{Action, Listing, MenuState, PhoneIntent, transition};
use super::{MenuError, Result};
use crate::console::Console;

/// Runs the interactive menus until the user quits or input ends.
pub struct MenuController<'s, C> {
    store: &'s ContactStore,
    console: C,
    page_size: usize,
}

impl<'s, C: Console> MenuController<'s, C> {
    pub fn new(store: &'s ContactStore, console: C, page_size: usize) -> Self {
        Self {
            store,
            console,
            page_size: page_size.max(1),
        }
    }

    /// Returns the console, for inspecting scripted output.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Runs from the main menu.
    pub fn run(&mut self) -> Result<()> {
        self.run_from(MenuState::Main)
    }

    /// Runs from `state` until [`MenuState::Exit`].
    ///
    /// End of input ends the session normally. Any other error is returned
    /// to the caller.
    pub fn run_from(&mut self, mut state: MenuState) -> Result<()> {
        while state != MenuState::Exit {
            state = match self.step(state) {
                Ok(next) => next,
                Err(MenuError::InputClosed) => {
                    debug!("input closed, leaving menus");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };
        }
        Ok(())
    }

    fn step(&mut self, state: MenuState) -> Result<MenuState> {
        for line in state.render() {
            self.console.print(&line)?;
        }
        let input = self.console.prompt(state.prompt_label())?;
        let action = transition(state, &input)?;
        self.apply(action)
    }

    /// Performs `action` and returns the state to show next.
    pub fn apply(&mut self, action: Action) -> Result<MenuState> {
        match action {
            Action::Goto(state) => Ok(state),
            Action::AddContact => self.add_contact(),
            Action::EditFilter { filters, key } => self.edit_filter(filters, key),
            Action::Search { filters } => self.search(&filters),
            Action::EditField { contact, field } => self.edit_field(contact, field),
            Action::RemoveContact { contact } => self.remove_contact(contact),
            Action::PickPhone { contact, intent } => self.pick_phone(contact, intent),
            Action::AddPhone { contact } => self.add_phone(contact),
            Action::ChangePhone { contact, phone } => self.change_phone(contact, phone),
            Action::RemovePhone { contact, phone } => self.remove_phone(contact, phone),
        }
    }

    fn add_contact(&mut self) -> Result<MenuState> {
        loop {
            let first_name = self.console.prompt("First name: ")?;
            let last_name = self.console.prompt("Last name: ")?;
            let email = self.console.prompt("E-mail: ")?;
            let email = email.trim();
            if !is_valid_email(email) {
                self.console
                    .print("Invalid e-mail address, please enter the contact again.")?;
                continue;
            }

            let contact = self
                .store
                .add(first_name.trim(), last_name.trim(), email)?;
            self.console.print(&format!("Contact added: {contact}"))?;
            return Ok(MenuState::ContactDetail { contact });
        }
    }

    fn edit_filter(&mut self, mut filters: SearchFilter, key: FilterKey) -> Result<MenuState> {
        let value = loop {
            let raw = self.console.prompt(&format!("Enter {}: ", key.label()))?;
            match SearchFilter::normalize(key, raw.trim()) {
                Ok(value) => break value,
                Err(err) => self.console.print(&err.to_string())?,
            }
        };

        if let Some(current) = filters.get(key) {
            let question = format!(
                "The {} filter is already set to \"{current}\". Replace it with \"{value}\"?",
                key.label()
            );
            if !self.console.confirm(&question)? {
                return Ok(MenuState::Find { filters });
            }
        }
        filters.set(key, value);
        Ok(MenuState::Find { filters })
    }

    fn search(&mut self, filters: &SearchFilter) -> Result<MenuState> {
        let contacts = self.store.find(filters)?;
        debug!(criteria = filters.len(), found = contacts.len(), "search finished");
        if contacts.is_empty() {
            self.console.print("No contacts found")?;
            return Ok(MenuState::Main);
        }
        Ok(MenuState::ContactList {
            listing: Listing::new(contacts, self.page_size),
        })
    }

    fn edit_field(&mut self, mut contact: Contact, field: ContactField) -> Result<MenuState> {
        let value = self.console.prompt(&format!("New {}: ", field.label()))?;
        let value = value.trim();
        if field == ContactField::Email && !is_valid_email(value) {
            self.console
                .print("Invalid e-mail address, contact not changed.")?;
            return Ok(MenuState::ContactDetail { contact });
        }

        if !contact.set(self.store, field, value)?.is_updated() {
            debug!(contact_id = ?contact.id(), %field, "contact row missing, edit skipped");
        }
        Ok(MenuState::ContactDetail { contact })
    }

    fn remove_contact(&mut self, mut contact: Contact) -> Result<MenuState> {
        let name = contact.to_string();
        if contact.remove(self.store)?.is_updated() {
            self.console.print(&format!("Contact {name} deleted"))?;
            return Ok(MenuState::Main);
        }
        Ok(MenuState::ContactDetail { contact })
    }

    fn pick_phone(&mut self, contact: Contact, intent: PhoneIntent) -> Result<MenuState> {
        let phones = contact.phones(self.store)?;
        if phones.is_empty() {
            self.console.print("No phone numbers found")?;
            return Ok(MenuState::Phones {
                contact,
                selected: None,
            });
        }
        Ok(MenuState::PhonePicker {
            contact,
            listing: Listing::new(phones, self.page_size),
            intent,
        })
    }

    fn add_phone(&mut self, contact: Contact) -> Result<MenuState> {
        loop {
            let raw = self.console.prompt("Phone number: ")?;
            match contact.add_phone(self.store, &raw) {
                Ok(phone) => {
                    self.console.print(&format!("Phone number {phone} added"))?;
                    return Ok(MenuState::Phones {
                        contact,
                        selected: Some(phone),
                    });
                }
                Err(StoreError::InvalidPhone(err)) => self.console.print(&err.to_string())?,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn change_phone(&mut self, contact: Contact, phone: PhoneRecord) -> Result<MenuState> {
        self.console.print(&format!("Current number: {phone}"))?;
        let number = self.prompt_phone("New phone number: ")?;

        let selected = if contact
            .change_phone(self.store, &phone, number.digits())?
            .is_updated()
        {
            self.console.print(&format!("Phone number changed to {number}"))?;
            Some(PhoneRecord::new(phone.id(), number, phone.contact_id()))
        } else {
            debug!(phone_id = phone.id(), "phone row missing, change skipped");
            None
        };
        Ok(MenuState::Phones { contact, selected })
    }

    fn remove_phone(&mut self, contact: Contact, phone: PhoneRecord) -> Result<MenuState> {
        if contact.remove_phone(self.store, &phone)?.is_updated() {
            self.console.print(&format!("Phone number {phone} removed"))?;
        }
        Ok(MenuState::Phones {
            contact,
            selected: None,
        })
    }

    /// Prompts until the answer parses as a phone number.
    fn prompt_phone(&mut self, label: &str) -> Result<PhoneNumber> {
        loop {
            let raw = self.console.prompt(label)?;
            match PhoneNumber::parse(&raw) {
                Ok(number) => return Ok(number),
                Err(err) => self.console.print(&err.to_string())?,
            }
        }
    }
}
