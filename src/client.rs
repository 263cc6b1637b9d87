//! Talks to the contacts API over HTTP.
//!
//! Each call is a single request: nothing here retries, backs off, or cancels.
use crate::{
    config::Config,
    contact::{Contact, ContactId, ContactRequest, ServingStatus, StatusUpdate},
};
use awc::{
    error::{JsonPayloadError, SendRequestError},
    http::StatusCode,
    Client, ClientResponse,
};
use log::*;
use std::fmt;

/// Contact lists can get long; awc's default JSON limit is only 64KiB.
const MAX_LIST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request never got a response: couldn't connect, timed out, and so on.
    Send(String),
    /// The backend answered, but not with success.
    Status(StatusCode),
    /// The backend's answer wasn't what we expected.
    Payload(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ClientError::*;

        match self {
            Send(e) => write!(f, "couldn't reach the contacts API: {}", e),
            Status(s) => write!(f, "the contacts API answered {}", s),
            Payload(e) => write!(f, "bad response from the contacts API: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<SendRequestError> for ClientError {
    fn from(e: SendRequestError) -> ClientError {
        ClientError::Send(e.to_string())
    }
}

impl From<JsonPayloadError> for ClientError {
    fn from(e: JsonPayloadError) -> ClientError {
        ClientError::Payload(e.to_string())
    }
}

fn successful<S>(res: ClientResponse<S>) -> Result<ClientResponse<S>, ClientError> {
    if res.status().is_success() {
        Ok(res)
    } else {
        Err(ClientError::Status(res.status()))
    }
}

/// A handle on the contacts API living under `base_url`, e.g. `http://127.0.0.1:8000/api`.
#[derive(Clone)]
pub struct ContactsApi {
    client: Client,
    base_url: String,
}

impl ContactsApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.as_str())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /contacts/`: every contact, or only those with the given status,
    /// in whatever order the backend lists them.
    ///
    /// # Errors
    ///
    /// The backend couldn't be reached, answered with a non-2xx status, or sent
    /// back something that isn't a list of contacts.
    pub async fn list(&self, filter: Option<ServingStatus>) -> Result<Vec<Contact>, ClientError> {
        let url = match filter {
            Some(status) => format!("{}/contacts/?status={}", self.base_url, status),
            None => format!("{}/contacts/", self.base_url),
        };
        debug!("GET {}", url);

        let mut res = successful(self.client.get(url.as_str()).send().await?)?;
        let contacts = res.json::<Vec<Contact>>().limit(MAX_LIST_BYTES).await?;
        trace!("got {} contacts", contacts.len());

        Ok(contacts)
    }

    /// `POST /contacts/submit/`: stores a contact request, returning the stored contact.
    ///
    /// # Errors
    ///
    /// As for [`ContactsApi::list`]; a request the backend rejects is a
    /// [`ClientError::Status`].
    pub async fn submit(&self, req: &ContactRequest) -> Result<Contact, ClientError> {
        let url = format!("{}/contacts/submit/", self.base_url);
        debug!("POST {}", url);

        let mut res = successful(self.client.post(url.as_str()).send_json(req).await?)?;
        Ok(res.json::<Contact>().await?)
    }

    /// `POST /contacts/update_status/<id>/`. Only success matters; the body is ignored.
    ///
    /// # Errors
    ///
    /// The backend couldn't be reached, or didn't answer with a 2xx (an unknown
    /// contact is a 404).
    pub async fn update_status(
        &self,
        id: ContactId,
        status: ServingStatus,
    ) -> Result<(), ClientError> {
        let url = format!("{}/contacts/update_status/{}/", self.base_url, id);
        debug!("POST {} -> {}", url, status);

        successful(
            self.client
                .post(url.as_str())
                .send_json(&StatusUpdate { status })
                .await?,
        )?;
        Ok(())
    }
}
