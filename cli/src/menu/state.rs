//! Menu states and the pure transition function.

use std::fmt;

use directory_core::{ContactField, FilterKey, PageToken, Pager, SearchFilter};
use directory_sqlite::{Contact, PhoneRecord};

use super::{Result, parse_choice};

/// A paginated list with its current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
}

/// Outcome of one navigation token applied to a [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep<T> {
    /// Still browsing, possibly on another page.
    Stay(Listing<T>),
    /// `0` was entered.
    Leave,
    /// An item on the current page was selected.
    Picked(T),
}

impl<T> Listing<T> {
    /// Starts a listing on page 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.page_size, self.items.len())
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items on the current page.
    pub fn visible(&self) -> &[T] {
        &self.items[self.pager().bounds(self.page)]
    }

    /// Applies a navigation token.
    ///
    /// `<` and `>` stop at the first and last page. An ordinal outside the
    /// current page keeps the listing unchanged.
    pub fn step(mut self, token: PageToken) -> PageStep<T> {
        let pager = self.pager();
        match token {
            PageToken::Prev => {
                self.page = pager.prev(self.page);
                PageStep::Stay(self)
            }
            PageToken::Next => {
                self.page = pager.next(self.page);
                PageStep::Stay(self)
            }
            PageToken::Exit => PageStep::Leave,
            PageToken::Pick(ordinal) => match pager.resolve(self.page, ordinal) {
                Some(index) => PageStep::Picked(self.items.swap_remove(index)),
                None => PageStep::Stay(self),
            },
        }
    }
}

impl<T: fmt::Display> Listing<T> {
    fn render(&self, title: &str) -> Vec<String> {
        let pager = self.pager();
        let mut lines = vec![
            String::new(),
            format!("{title} (page {} of {}):", self.page, pager.page_count()),
        ];
        lines.extend(
            self.visible()
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{} - {item}", i + 1)),
        );
        let mut nav = Vec::new();
        if pager.has_prev(self.page) {
            nav.push("< - previous page");
        }
        if pager.has_next(self.page) {
            nav.push("> - next page");
        }
        nav.push("0 - back");
        lines.push(nav.join(", "));
        lines
    }
}

/// What the phone picker does with the phone the user selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneIntent {
    /// Make it the phone menu's selection.
    Browse,
    /// Ask for a replacement number.
    Change,
    /// Delete it.
    Remove,
}

/// One screen of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Main,
    Find {
        filters: SearchFilter,
    },
    ContactList {
        listing: Listing<Contact>,
    },
    ContactDetail {
        contact: Contact,
    },
    Phones {
        contact: Contact,
        selected: Option<PhoneRecord>,
    },
    PhonePicker {
        contact: Contact,
        listing: Listing<PhoneRecord>,
        intent: PhoneIntent,
    },
    Exit,
}

impl MenuState {
    /// Lines printed before the state's prompt.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![String::new()];
        match self {
            Self::Main => lines.extend(
                ["Main menu:", "1 - Add contact", "2 - Find contact", "0 - Quit"].map(String::from),
            ),
            Self::Find { filters } => {
                lines.push("Find contact:".to_string());
                for (n, key) in FilterKey::ALL.iter().enumerate() {
                    let current = filters
                        .get(*key)
                        .map(|value| format!(" [{value}]"))
                        .unwrap_or_default();
                    lines.push(format!("{} - Set {}{current}", n + 1, key.label()));
                }
                lines.push("9 - Search".to_string());
                lines.push("0 - Back to main menu".to_string());
            }
            Self::ContactList { listing } => return listing.render("Contacts"),
            Self::ContactDetail { contact } => {
                lines.push(format!("Contact: {contact}"));
                lines.push("1 - Phone numbers".to_string());
                for (n, field) in ContactField::ALL.iter().enumerate() {
                    lines.push(format!("{} - Edit {}", n + 2, field.label()));
                }
                lines.push("5 - Delete contact".to_string());
                lines.push("0 - Back to main menu".to_string());
            }
            Self::Phones { contact, selected } => {
                lines.push(format!(
                    "Phone numbers of {} {}:",
                    contact.first_name(),
                    contact.last_name()
                ));
                if let Some(phone) = selected {
                    lines.push(format!("Selected: {phone}"));
                }
                lines.extend(
                    [
                        "1 - Show all",
                        "2 - Add phone number",
                        "3 - Change phone number",
                        "4 - Remove phone number",
                        "0 - Back to main menu",
                    ]
                    .map(String::from),
                );
            }
            Self::PhonePicker { listing, .. } => return listing.render("Phone numbers"),
            Self::Exit => lines.clear(),
        }
        lines
    }

    /// Prompt shown after [`render`](Self::render).
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::ContactList { .. } => "Choose a contact: ",
            Self::PhonePicker { .. } => "Choose a phone number: ",
            _ => "Choose an option: ",
        }
    }
}

/// What the controller does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show another state; no store access needed.
    Goto(MenuState),
    AddContact,
    EditFilter {
        filters: SearchFilter,
        key: FilterKey,
    },
    Search {
        filters: SearchFilter,
    },
    EditField {
        contact: Contact,
        field: ContactField,
    },
    RemoveContact {
        contact: Contact,
    },
    /// Load the contact's phones into a picker.
    PickPhone {
        contact: Contact,
        intent: PhoneIntent,
    },
    AddPhone {
        contact: Contact,
    },
    ChangePhone {
        contact: Contact,
        phone: PhoneRecord,
    },
    RemovePhone {
        contact: Contact,
        phone: PhoneRecord,
    },
}

/// Maps one line of input in `state` to the next action.
///
/// Unknown menu numbers redisplay the same state. Non-numeric input fails
/// with [`MenuError::InvalidChoice`](super::MenuError::InvalidChoice).
pub fn transition(state: MenuState, input: &str) -> Result<Action> {
    let action = match state {
        MenuState::Main => match parse_choice(input)? {
            1 => Action::AddContact,
            2 => Action::Goto(MenuState::Find {
                filters: SearchFilter::new(),
            }),
            0 => Action::Goto(MenuState::Exit),
            _ => Action::Goto(MenuState::Main),
        },
        MenuState::Find { filters } => match parse_choice(input)? {
            n @ 1..=4 => Action::EditFilter {
                filters,
                key: FilterKey::ALL[n as usize - 1],
            },
            9 => Action::Search { filters },
            0 => Action::Goto(MenuState::Main),
            _ => Action::Goto(MenuState::Find { filters }),
        },
        MenuState::ContactList { listing } => match listing.step(PageToken::parse(input)?) {
            PageStep::Stay(listing) => Action::Goto(MenuState::ContactList { listing }),
            PageStep::Leave => Action::Goto(MenuState::Main),
            PageStep::Picked(contact) => Action::Goto(MenuState::ContactDetail { contact }),
        },
        MenuState::ContactDetail { contact } => match parse_choice(input)? {
            1 => Action::Goto(MenuState::Phones {
                contact,
                selected: None,
            }),
            n @ 2..=4 => Action::EditField {
                contact,
                field: ContactField::ALL[n as usize - 2],
            },
            5 => Action::RemoveContact { contact },
            0 => Action::Goto(MenuState::Main),
            _ => Action::Goto(MenuState::ContactDetail { contact }),
        },
        MenuState::Phones { contact, selected } => match parse_choice(input)? {
            1 => Action::PickPhone {
                contact,
                intent: PhoneIntent::Browse,
            },
            2 => Action::AddPhone { contact },
            3 => match selected {
                Some(phone) => Action::ChangePhone { contact, phone },
                None => Action::PickPhone {
                    contact,
                    intent: PhoneIntent::Change,
                },
            },
            4 => match selected {
                Some(phone) => Action::RemovePhone { contact, phone },
                None => Action::PickPhone {
                    contact,
                    intent: PhoneIntent::Remove,
                },
            },
            0 => Action::Goto(MenuState::Main),
            _ => Action::Goto(MenuState::Phones { contact, selected }),
        },
        MenuState::PhonePicker {
            contact,
            listing,
            intent,
        } => match listing.step(PageToken::parse(input)?) {
            PageStep::Stay(listing) => Action::Goto(MenuState::PhonePicker {
                contact,
                listing,
                intent,
            }),
            PageStep::Leave => Action::Goto(MenuState::Phones {
                contact,
                selected: None,
            }),
            PageStep::Picked(phone) => match intent {
                PhoneIntent::Browse => Action::Goto(MenuState::Phones {
                    contact,
                    selected: Some(phone),
                }),
                PhoneIntent::Change => Action::ChangePhone { contact, phone },
                PhoneIntent::Remove => Action::RemovePhone { contact, phone },
            },
        },
        MenuState::Exit => Action::Goto(MenuState::Exit),
    };
    Ok(action)
}
