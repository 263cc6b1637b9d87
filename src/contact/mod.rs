//! The shape of a contact, from the moment someone starts typing into the form
//! to the record that sits in storage being triaged.
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

pub mod validate;
pub use validate::{validate, Field, FieldError, FieldErrors};

/// Identifies a stored contact. Storage hands these out, starting from 1.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returned when a wire name doesn't belong to any variant of the enum being parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub name: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.name)
    }
}

impl std::error::Error for UnknownVariant {}

/// What someone is getting in touch with us about.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    WebDevelopment,
    MobileApp,
    UiUx,
    Consulting,
    Maintenance,
    /// Anything else; the contact must then say what in `other_service`.
    Other,
}

impl Service {
    /// Every service, in the order the form offers them.
    pub const ALL: [Service; 6] = [
        Service::WebDevelopment,
        Service::MobileApp,
        Service::UiUx,
        Service::Consulting,
        Service::Maintenance,
        Service::Other,
    ];

    /// The name this service goes by on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use Service::*;

        match self {
            WebDevelopment => "web_development",
            MobileApp => "mobile_app",
            UiUx => "ui_ux",
            Consulting => "consulting",
            Maintenance => "maintenance",
            Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        use Service::*;

        match self {
            WebDevelopment => "Web Development",
            MobileApp => "Mobile App Development",
            UiUx => "UI/UX Design",
            Consulting => "IT Consulting",
            Maintenance => "Maintenance & Support",
            Other => "Other",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Service {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .iter()
            .copied()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "service",
                name: s.to_string(),
            })
    }
}

/// Where a contact is in triage. These are peers, not stages: any status may
/// be changed to any other, `Done` back to `Initial` included.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServingStatus {
    Initial,
    InContact,
    Done,
    NoResponse,
    Ignore,
}

impl Default for ServingStatus {
    fn default() -> Self {
        ServingStatus::Initial
    }
}

impl ServingStatus {
    /// Every status, in the order the status dropdown lists them.
    pub const ALL: [ServingStatus; 5] = [
        ServingStatus::Initial,
        ServingStatus::InContact,
        ServingStatus::Done,
        ServingStatus::NoResponse,
        ServingStatus::Ignore,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        use ServingStatus::*;

        match self {
            Initial => "initial",
            InContact => "in_contact",
            Done => "done",
            NoResponse => "no_response",
            Ignore => "ignore",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        use ServingStatus::*;

        match self {
            Initial => "Initial",
            InContact => "In Contact",
            Done => "Done",
            NoResponse => "No Response",
            Ignore => "Ignore",
        }
    }
}

impl fmt::Display for ServingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServingStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "serving status",
                name: s.to_string(),
            })
    }
}

/// A contact request as the form holds it while it's being filled out, and as it's
/// sent to the backend once it passes [`validate`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContactRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// `None` until a service has been picked. The form's unselected `""` means the same.
    #[serde(default, deserialize_with = "unselected_service")]
    pub service: Option<Service>,
    #[serde(default)]
    pub other_service: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn unselected_service<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Service>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

impl ContactRequest {
    /// Checks this request and, if every rule holds, turns it into a [`Submission`]
    /// that storage can accept as-is.
    ///
    /// Text fields are trimmed, a blank phone number becomes `None`, and
    /// `other_service` is dropped unless the service is [`Service::Other`].
    ///
    /// # Errors
    ///
    /// Every rule the request breaks, keyed by field, as [`validate`] reports them.
    pub fn into_submission(self) -> Result<Submission, FieldErrors> {
        let errors = validate(&self);
        let service = match self.service {
            Some(service) if errors.is_empty() => service,
            _ => return Err(errors),
        };

        let non_blank = |s: Option<String>| {
            s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        Ok(Submission {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: non_blank(self.phone_number),
            other_service: match service {
                Service::Other => non_blank(self.other_service),
                _ => None,
            },
            service,
            description: self.description.trim().to_string(),
        })
    }
}

/// A contact request that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub service: Service,
    pub other_service: Option<String>,
    pub description: String,
}

impl Submission {
    /// The record storage keeps for this submission. New contacts always start
    /// out as [`ServingStatus::Initial`].
    #[must_use]
    pub fn into_contact(self, id: ContactId, created_at: DateTime<Utc>) -> Contact {
        Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            service: self.service,
            other_service: self.other_service,
            description: self.description,
            serving_status: ServingStatus::Initial,
            created_at,
        }
    }
}

/// A contact as storage keeps it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub service: Service,
    pub other_service: Option<String>,
    pub description: String,
    #[serde(default)]
    pub serving_status: ServingStatus,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.full_name(), self.service)
    }
}

/// The body of a request to change a contact's serving status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: ServingStatus,
}

#[cfg(test)]
mod test {
    use super::*;

    fn ada() -> ContactRequest {
        ContactRequest {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: Some("   ".to_string()),
            service: Some(Service::Consulting),
            other_service: Some("knitting".to_string()),
            description: "Need advice".to_string(),
        }
    }

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for status in &ServingStatus::ALL {
            assert_eq!(status.as_str().parse::<ServingStatus>(), Ok(*status));
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.as_str().to_string()),
            );
        }
        for service in &Service::ALL {
            assert_eq!(service.as_str().parse::<Service>(), Ok(*service));
        }

        let err = "finished".parse::<ServingStatus>().unwrap_err();
        assert_eq!(err.name, "finished");
    }

    #[test]
    fn submission_normalizes_fields() {
        let sub = ada().into_submission().expect("ada should be valid");

        assert_eq!(sub.first_name, "Ada");
        assert_eq!(sub.phone_number, None, "blank phone should become None");
        assert_eq!(
            sub.other_service, None,
            "other_service should be ignored when service isn't Other"
        );
    }

    #[test]
    fn submission_keeps_other_service_for_other() {
        let sub = ContactRequest {
            service: Some(Service::Other),
            ..ada()
        }
        .into_submission()
        .expect("ada should be valid");

        assert_eq!(sub.other_service.as_deref(), Some("knitting"));
    }

    #[test]
    fn invalid_request_is_not_a_submission() {
        let errors = ContactRequest {
            service: None,
            ..ada()
        }
        .into_submission()
        .unwrap_err();

        assert!(errors.get(Field::Service).is_some());
    }

    #[test]
    fn new_contacts_start_initial() {
        let contact = ada()
            .into_submission()
            .unwrap()
            .into_contact(ContactId(7), Utc::now());

        assert_eq!(contact.serving_status, ServingStatus::Initial);
        assert_eq!(contact.to_string(), "Ada Lovelace - consulting");
    }

    #[test]
    fn contact_json_matches_wire_shape() {
        let json = serde_json::json!({
            "id": 3,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone_number": null,
            "service": "ui_ux",
            "other_service": null,
            "description": "Need advice",
            "serving_status": "no_response",
            "created_at": "2020-08-01T12:00:00Z"
        });

        let contact: Contact = serde_json::from_value(json).expect("bad contact json");
        assert_eq!(contact.id, ContactId(3));
        assert_eq!(contact.service, Service::UiUx);
        assert_eq!(contact.serving_status, ServingStatus::NoResponse);
    }

    #[test]
    fn unselected_service_reads_as_none() {
        for service in &[serde_json::json!(""), serde_json::json!(null)] {
            let req: ContactRequest =
                serde_json::from_value(serde_json::json!({ "service": service }))
                    .expect("an unselected service should still parse");
            assert_eq!(req.service, None);
        }

        let req: ContactRequest = serde_json::from_value(serde_json::json!({}))
            .expect("a missing service should still parse");
        assert_eq!(req.service, None);

        let req: ContactRequest =
            serde_json::from_value(serde_json::json!({ "service": "mobile_app" }))
                .expect("a real service should parse");
        assert_eq!(req.service, Some(Service::MobileApp));

        assert!(
            serde_json::from_value::<ContactRequest>(serde_json::json!({ "service": "plumbing" }))
                .is_err()
        );
    }
}
