//! The contact list: fetch contacts by serving status, then move them between statuses.
//!
//! Status changes are optimistic. Once the backend accepts one, the contact in the
//! local list is patched in place instead of fetching the whole list again.
use crate::{
    client::{ClientError, ContactsApi},
    contact::{Contact, ContactId, ServingStatus},
};
use log::*;
use std::fmt;

pub const FETCH_BANNER: &str = "Failed to fetch contacts. Please try again later.";

/// Loading the list failed. The view shows a banner instead of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchError(pub ClientError);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", FETCH_BANNER, self.0)
    }
}

impl std::error::Error for FetchError {}

/// The backend didn't accept a status change, so the contact still shows its old status.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateError {
    pub id: ContactId,
    pub status: ServingStatus,
    pub source: ClientError,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "couldn't mark contact #{} as {}: {}",
            self.id,
            self.status.label(),
            self.source
        )
    }
}

impl std::error::Error for UpdateError {}

/// Everything the list view shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// `None` shows contacts in every status.
    pub filter: Option<ServingStatus>,
    contacts: Vec<Contact>,
    pub fetch_error: Option<FetchError>,
    /// The last status change that didn't go through, until the next one that does.
    pub update_error: Option<UpdateError>,
}

impl ListState {
    #[must_use]
    pub fn new(filter: Option<ServingStatus>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// The contacts as the backend last listed them, plus any status changes made since.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    #[must_use]
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Swaps in a freshly fetched list, in the order it was fetched.
    pub fn replace(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.fetch_error = None;
        self.update_error = None;
    }

    /// The list couldn't be fetched: show nothing but the error.
    pub fn fetch_failed(&mut self, e: FetchError) {
        self.contacts.clear();
        self.fetch_error = Some(e);
    }

    /// Sets one contact's status in place. The contact stays in the list even if it
    /// no longer matches the filter. Returns whether the contact was in the list.
    pub fn patch_status(&mut self, id: ContactId, status: ServingStatus) -> bool {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.serving_status = status;
                true
            }
            None => false,
        }
    }
}

/// Drives a [`ListState`] against the backend.
pub struct Tracker {
    api: ContactsApi,
    state: ListState,
}

impl Tracker {
    #[must_use]
    pub fn new(api: ContactsApi) -> Self {
        Self::with_state(api, ListState::default())
    }

    #[must_use]
    pub fn with_state(api: ContactsApi, state: ListState) -> Self {
        Self { api, state }
    }

    #[must_use]
    pub fn state(&self) -> &ListState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> ListState {
        self.state
    }

    /// The contacts currently on screen.
    #[must_use]
    pub fn list(&self) -> &[Contact] {
        self.state.contacts()
    }

    /// Fetches the list again with the current filter, replacing what was there.
    ///
    /// # Errors
    ///
    /// A [`FetchError`] if the list couldn't be fetched. The list is then emptied
    /// and the error kept in [`ListState::fetch_error`].
    pub async fn refresh(&mut self) -> Result<&[Contact], FetchError> {
        match self.api.list(self.state.filter).await {
            Ok(contacts) => {
                self.state.replace(contacts);
                Ok(self.state.contacts())
            }
            Err(e) => {
                error!("error fetching contacts: {}", e);
                let e = FetchError(e);
                self.state.fetch_failed(e.clone());
                Err(e)
            }
        }
    }

    /// Shows only contacts in `filter` (or all of them, for `None`).
    ///
    /// # Errors
    ///
    /// As for [`Tracker::refresh`].
    pub async fn set_filter(
        &mut self,
        filter: Option<ServingStatus>,
    ) -> Result<&[Contact], FetchError> {
        self.state.filter = filter;
        self.refresh().await
    }

    /// Asks the backend to move a contact into `status`. If it agrees, the local copy
    /// is patched to match; if not, the local copy is left alone and the error is both
    /// returned and kept in [`ListState::update_error`].
    ///
    /// # Errors
    ///
    /// An [`UpdateError`] naming the contact and status if the backend refused.
    pub async fn update_status(
        &mut self,
        id: ContactId,
        status: ServingStatus,
    ) -> Result<(), UpdateError> {
        match self.api.update_status(id, status).await {
            Ok(()) => {
                if !self.state.patch_status(id, status) {
                    warn!("contact #{} was updated but isn't in the list", id);
                }
                self.state.update_error = None;
                Ok(())
            }
            Err(source) => {
                let e = UpdateError { id, status, source };
                error!("error updating status: {}", e);
                self.state.update_error = Some(e.clone());
                Err(e)
            }
        }
    }
}
