//! The contact form: a draft, whatever's wrong with it, and how the last submission went.
use crate::{
    client::{ClientError, ContactsApi},
    contact::{validate, Contact, ContactRequest, Field, FieldErrors},
};
use log::*;
use std::fmt;

/// Shown when the backend wouldn't take a submission, whatever the reason.
pub const FAILED_BANNER: &str = "Failed to submit your request. Please try again later.";
pub const SUBMITTED_BANNER: &str =
    "Your message has been sent successfully! We'll get back to you soon.";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Submitted(Contact),
    Failed,
}

/// Everything the form view shows. The view owns one of these and hands it to
/// [`submit`] each time the submit button is pressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub draft: ContactRequest,
    /// From the last submit attempt, minus any fields edited since.
    pub errors: FieldErrors,
    pub outcome: Option<Outcome>,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one field of the draft. Any error showing next to that field goes away.
    ///
    /// For [`Field::Service`], a value that isn't a service's wire name unselects the service.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let optional = |v: String| if v.is_empty() { None } else { Some(v) };
        let draft = &mut self.draft;

        match field {
            Field::FirstName => draft.first_name = value,
            Field::LastName => draft.last_name = value,
            Field::Email => draft.email = value,
            Field::PhoneNumber => draft.phone_number = optional(value),
            Field::Service => draft.service = value.parse().ok(),
            Field::OtherService => draft.other_service = optional(value),
            Field::Description => draft.description = value,
        }

        self.errors.remove(field);
    }

    /// The message to show next to `field`, if there's a problem with it.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<String> {
        self.errors.get(field).map(|e| e.message(field))
    }

    /// The banner above the form, if there is one.
    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.outcome.as_ref().map(|o| match o {
            Outcome::Submitted(_) => SUBMITTED_BANNER,
            Outcome::Failed => FAILED_BANNER,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// The draft didn't pass validation, so nothing was sent.
    Invalid(FieldErrors),
    /// The backend didn't store the contact.
    Failed(ClientError),
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmissionError::Invalid(errors) => write!(f, "invalid contact request: {}", errors),
            SubmissionError::Failed(_) => write!(f, "{}", FAILED_BANNER),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Validates the draft afresh and, if it holds up, sends it to the backend.
///
/// On success the draft is cleared for the next person. On any failure the draft is
/// left as it was so it can be fixed up or simply resubmitted.
///
/// # Errors
///
/// [`SubmissionError::Invalid`] if the draft doesn't validate, in which case nothing
/// is sent; [`SubmissionError::Failed`] if the backend didn't take it.
pub async fn submit(api: &ContactsApi, state: &mut FormState) -> Result<Contact, SubmissionError> {
    state.outcome = None;
    state.errors = validate(&state.draft);

    if !state.errors.is_empty() {
        debug!("not submitting, draft is invalid: {}", state.errors);
        return Err(SubmissionError::Invalid(state.errors.clone()));
    }

    match api.submit(&state.draft).await {
        Ok(contact) => {
            info!("submitted contact #{}: {}", contact.id, contact);
            state.draft = ContactRequest::default();
            state.outcome = Some(Outcome::Submitted(contact.clone()));
            Ok(contact)
        }
        Err(e) => {
            error!("form submission error: {}", e);
            state.outcome = Some(Outcome::Failed);
            Err(SubmissionError::Failed(e))
        }
    }
}
