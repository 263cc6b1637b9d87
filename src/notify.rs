//! `Notifier` is an actor. It lets whoever triages contacts know that a new one came in.

use actix::{Actor, Context, Handler, Message};
use log::*;

use crate::{config::Config, contact::Contact};

/// What gets sent to the admin when someone submits the contact form.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notice {
    pub const SUBJECT: &'static str = "New Contact Form Submission";

    #[must_use]
    pub fn new_submission(from: &str, to: &str, contact: &Contact) -> Self {
        let service = match (&contact.other_service, contact.service.label()) {
            (Some(other), label) => format!("{} ({})", label, other),
            (None, label) => label.to_string(),
        };

        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: Self::SUBJECT.to_string(),
            body: format!(
                "New contact form submission:\n\
                 Name: {}\n\
                 Service: {}\n\
                 Email: {}\n\
                 Phone: {}\n\
                 Description: {}\n",
                contact.full_name(),
                service,
                contact.email,
                contact.phone_number.as_deref().unwrap_or("Not provided"),
                contact.description,
            ),
        }
    }
}

/// A contact was just stored.
#[derive(Message)]
#[rtype(result = "()")]
pub struct NewSubmission(pub Contact);

impl Handler<NewSubmission> for Notifier {
    type Result = ();

    fn handle(&mut self, NewSubmission(contact): NewSubmission, _: &mut Context<Self>) {
        let notice = Notice::new_submission(&self.from, &self.admin, &contact);
        info!(
            "notice for {} from {}: {}\n{}",
            notice.to, notice.from, notice.subject, notice.body
        );
        self.sent += 1;
    }
}

/// How many notices have gone out so far.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct SentCount;

impl Handler<SentCount> for Notifier {
    type Result = usize;

    fn handle(&mut self, _: SentCount, _: &mut Context<Self>) -> usize {
        self.sent
    }
}

/// Delivers notices by writing them to the log.
pub struct Notifier {
    admin: String,
    from: String,
    sent: usize,
}

impl Notifier {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            admin: config.admin_email.clone(),
            from: config.from_email.clone(),
            sent: 0,
        }
    }
}

impl Actor for Notifier {
    type Context = Context<Self>;
}
