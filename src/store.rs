//! `Store` is an actor. It owns every contact we know about, and hands out ids.
//!
//! Keeping the contacts inside one actor means handlers on every worker thread
//! see the same records, and two submissions can never be given the same id.

use actix::{Actor, Context, Handler, Message, MessageResult};
use chrono::Utc;
use log::*;

use crate::contact::{Contact, ContactId, ServingStatus, Submission};

/// List contacts, newest first. With a status, only contacts in that status are listed.
#[derive(Message)]
#[rtype(result = "Vec<Contact>")]
pub struct ListContacts(pub Option<ServingStatus>);

impl Handler<ListContacts> for Store {
    type Result = MessageResult<ListContacts>;

    fn handle(&mut self, ListContacts(filter): ListContacts, _: &mut Context<Self>) -> Self::Result {
        MessageResult(
            self.contacts
                .iter()
                .rev()
                .filter(|c| filter.map_or(true, |s| c.serving_status == s))
                .cloned()
                .collect(),
        )
    }
}

/// Store a new contact. It'll be given the next id and start out as `Initial`.
#[derive(Message)]
#[rtype(result = "Contact")]
pub struct CreateContact(pub Submission);

impl Handler<CreateContact> for Store {
    type Result = MessageResult<CreateContact>;

    fn handle(&mut self, CreateContact(sub): CreateContact, _: &mut Context<Self>) -> Self::Result {
        self.last_id += 1;
        let contact = sub.into_contact(ContactId(self.last_id), Utc::now());
        debug!("storing contact #{}: {}", contact.id, contact);

        self.contacts.push(contact.clone());
        MessageResult(contact)
    }
}

/// Look up a single contact.
#[derive(Message)]
#[rtype(result = "Option<Contact>")]
pub struct GetContact(pub ContactId);

impl Handler<GetContact> for Store {
    type Result = Option<Contact>;

    fn handle(&mut self, GetContact(id): GetContact, _: &mut Context<Self>) -> Self::Result {
        self.contacts.iter().find(|c| c.id == id).cloned()
    }
}

/// Move a contact to another serving status. Any status can follow any other.
/// Returns the updated contact, or `None` if there's no contact with that id.
#[derive(Message)]
#[rtype(result = "Option<Contact>")]
pub struct SetStatus(pub ContactId, pub ServingStatus);

impl Handler<SetStatus> for Store {
    type Result = Option<Contact>;

    fn handle(&mut self, SetStatus(id, status): SetStatus, _: &mut Context<Self>) -> Self::Result {
        let contact = self.contacts.iter_mut().find(|c| c.id == id)?;
        debug!(
            "contact #{}: {} -> {}",
            id, contact.serving_status, status
        );

        contact.serving_status = status;
        Some(contact.clone())
    }
}

/// Keeps contacts in memory, in the order they were created.
#[derive(Default)]
pub struct Store {
    contacts: Vec<Contact>,
    last_id: u64,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Actor for Store {
    type Context = Context<Self>;
}
