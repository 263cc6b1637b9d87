//! # Contact desk
//! People fill out a contact form; whoever answers them triages the submissions by
//! serving status.
//!
//! ## Submitting a contact
//! The form's draft is a [`ContactRequest`]. [`validate`] checks every field at once,
//! and only a draft with no errors is sent to `POST /api/contacts/submit/`. The backend
//! stores it as a [`Contact`] with a fresh id and the `initial` status.
//!
//! ## Triage
//! `GET /api/contacts/?status=<status>` lists contacts, optionally only those in one
//! status. `POST /api/contacts/update_status/<id>/` moves a contact to any other status.
//!
//! The `webserver` feature provides the backend, the `client` feature the HTTP client
//! along with the form and list views built on it.

#![deny(clippy::pedantic)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod config;
pub mod contact;
pub use config::{Config, ConfigError};
pub use contact::{
    validate, Contact, ContactId, ContactRequest, Field, FieldError, FieldErrors, Service,
    ServingStatus,
};

#[cfg(feature = "webserver")]
pub mod notify;
#[cfg(feature = "webserver")]
pub mod routes;
#[cfg(feature = "webserver")]
pub mod store;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod form;
#[cfg(feature = "client")]
pub mod tracker;
#[cfg(feature = "client")]
pub use client::{ClientError, ContactsApi};

#[cfg(all(test, feature = "webserver", feature = "client"))]
mod testing;

#[cfg(feature = "webserver")]
pub use error::ServiceError;

#[cfg(feature = "webserver")]
mod error {
    use crate::contact::FieldErrors;
    use actix_web::{error::ResponseError, HttpResponse};
    use log::*;
    use std::fmt;

    #[derive(Debug)]
    /// The contacts API was unable to service you, for any of these reasons.
    pub enum ServiceError {
        /// Something went wrong on our end.
        InternalServerError,
        /// The request you sent us was invalid or not usable for any number of reasons.
        BadRequest(String),
        /// The contact you submitted didn't pass validation.
        Invalid(FieldErrors),
        /// We don't know anything about what you requested.
        NotFound(String),
    }
    impl ServiceError {
        /// A shortcut for making a `ServiceError::BadRequest`.
        /// ```
        /// use contact_desk::ServiceError;
        ///
        /// let br = ServiceError::bad_request("Invalid status");
        /// let is_br = matches!(br, ServiceError::BadRequest(_));
        /// assert!(is_br, "ServiceError::bad_request() should always return a BadRequest variant");
        /// ```
        #[must_use]
        pub fn bad_request<T: ToString + ?Sized>(t: &T) -> Self {
            Self::BadRequest(t.to_string())
        }

        #[must_use]
        pub fn not_found<T: ToString + ?Sized>(t: &T) -> Self {
            Self::NotFound(t.to_string())
        }
    }

    impl fmt::Display for ServiceError {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            use ServiceError::*;

            match self {
                InternalServerError => write!(f, "Internal Server Error"),
                BadRequest(s) => write!(f, "Bad Request: {}", s),
                Invalid(errors) => write!(f, "Invalid contact: {}", errors),
                NotFound(s) => write!(f, "Not Found: {}", s),
            }
        }
    }

    impl std::error::Error for ServiceError {}

    impl ResponseError for ServiceError {
        fn error_response(&self) -> HttpResponse {
            error!("{}", self);
            let body = |s: &str| serde_json::json!({ "error": s });

            match self {
                ServiceError::InternalServerError => HttpResponse::InternalServerError()
                    .json(body("Internal Server Error. Try again later.")),
                ServiceError::BadRequest(s) => HttpResponse::BadRequest().json(body(s)),
                ServiceError::Invalid(errors) => HttpResponse::BadRequest().json(errors),
                ServiceError::NotFound(s) => HttpResponse::NotFound().json(body(s)),
            }
        }
    }

    impl From<FieldErrors> for ServiceError {
        fn from(errors: FieldErrors) -> ServiceError {
            ServiceError::Invalid(errors)
        }
    }

    impl From<actix::MailboxError> for ServiceError {
        fn from(e: actix::MailboxError) -> ServiceError {
            error!("mailbox error: {}", e);
            ServiceError::InternalServerError
        }
    }
}
