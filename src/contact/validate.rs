use super::{ContactRequest, Service};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    /// Something, an @, something, a dot, something. Deliberately loose.
    static ref EMAIL: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();
}

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_OTHER_SERVICE_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;

/// The fields of a [`ContactRequest`] that can be wrong.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Service,
    OtherService,
    Description,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use Field::*;

        match self {
            FirstName => "first_name",
            LastName => "last_name",
            Email => "email",
            PhoneNumber => "phone_number",
            Service => "service",
            OtherService => "other_service",
            Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What's wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Nothing (or only whitespace) was entered.
    Required,
    /// Something was entered, but it isn't usable. Only emails can be invalid.
    Invalid,
    TooLong { max: usize },
}

impl FieldError {
    /// The message shown next to `field` in the form.
    #[must_use]
    pub fn message(self, field: Field) -> String {
        use Field::*;
        use FieldError::*;

        match (field, self) {
            (FirstName, Required) => "First name is required".to_string(),
            (LastName, Required) => "Last name is required".to_string(),
            (Email, Required) => "Email is required".to_string(),
            (Email, Invalid) => "Email is invalid".to_string(),
            (Service, Required) => "Please select a service".to_string(),
            (OtherService, Required) => "Please specify the service".to_string(),
            (Description, Required) => "Description is required".to_string(),
            (field, TooLong { max }) => format!("{} must be at most {} characters", field, max),
            (field, _) => format!("{} is invalid", field),
        }
    }
}

/// Every problem [`validate`] found with a draft, at most one per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, FieldError>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, error.message(field))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Serializes as a map from each field's wire name to its message.
impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (field, error) in self.iter() {
            map.serialize_entry(field.as_str(), &error.message(field))?;
        }
        map.end()
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Checks every rule a draft must pass before it can be submitted. Every rule is
/// checked, so the result holds all of the draft's problems at once; an empty
/// result means the draft can be submitted.
#[must_use]
pub fn validate(draft: &ContactRequest) -> FieldErrors {
    use FieldError::*;

    let mut errors = FieldErrors::default();
    let mut check_len = |field, value: &str, max| {
        if value.trim().chars().count() > max {
            errors.insert(field, TooLong { max });
        }
    };

    check_len(Field::FirstName, &draft.first_name, MAX_NAME_LEN);
    check_len(Field::LastName, &draft.last_name, MAX_NAME_LEN);
    check_len(Field::Email, &draft.email, MAX_EMAIL_LEN);
    if let Some(phone) = &draft.phone_number {
        check_len(Field::PhoneNumber, phone, MAX_PHONE_LEN);
    }
    if let (Some(Service::Other), Some(other)) = (draft.service, &draft.other_service) {
        check_len(Field::OtherService, other, MAX_OTHER_SERVICE_LEN);
    }

    if blank(&draft.first_name) {
        errors.insert(Field::FirstName, Required);
    }
    if blank(&draft.last_name) {
        errors.insert(Field::LastName, Required);
    }

    if blank(&draft.email) {
        errors.insert(Field::Email, Required);
    } else if !EMAIL.is_match(&draft.email) {
        errors.insert(Field::Email, Invalid);
    }

    match draft.service {
        None => errors.insert(Field::Service, Required),
        Some(Service::Other) if draft.other_service.as_deref().map_or(true, blank) => {
            errors.insert(Field::OtherService, Required)
        }
        Some(_) => {}
    }

    if blank(&draft.description) {
        errors.insert(Field::Description, Required);
    }

    errors
}
