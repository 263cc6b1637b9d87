use crate::{
    contact::{ContactId, ContactRequest, ServingStatus},
    notify::{NewSubmission, Notifier},
    store::{CreateContact, GetContact, ListContacts, SetStatus, Store},
    ServiceError,
};
use actix::Addr;
use actix_web::{get, post, web, HttpResponse};
use log::*;
use serde::Deserialize;

/// Registers every contacts route. Expects an `Addr<Store>` and an `Addr<Notifier>`
/// to have been registered as app data, and [`json_config`] as app data too.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_contacts)
        .service(submit_contact)
        .service(update_status);
}

/// Makes JSON bodies we can't even parse come back as `{"error": ...}` like every other
/// bad request, instead of an empty 400.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|e, _| ServiceError::bad_request(&format!("Invalid JSON: {}", e)).into())
}

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[get("/contacts/")]
/// Lists contacts, newest first. A blank or missing `status` lists every contact;
/// a status nobody can be in lists nobody.
pub async fn get_contacts(
    query: web::Query<ListQuery>,
    store: web::Data<Addr<Store>>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing get_contacts request");

    let filter = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => match s.parse::<ServingStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                debug!("{}, so no contacts match", e);
                return Ok(HttpResponse::Ok().json(serde_json::json!([])));
            }
        },
    };

    let contacts = store.send(ListContacts(filter)).await?;
    trace!("listing {} contacts with status {:?}", contacts.len(), filter);

    Ok(HttpResponse::Ok().json(contacts))
}

#[post("/contacts/submit/")]
/// Validates and stores a new contact, then lets the admin know about it.
pub async fn submit_contact(
    req: web::Json<ContactRequest>,
    store: web::Data<Addr<Store>>,
    notifier: web::Data<Addr<Notifier>>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing submit_contact request");
    trace!("contact request: {:#?}", req);

    let submission = req.into_inner().into_submission()?;
    let contact = store.send(CreateContact(submission)).await?;

    // a notice that can't be delivered shouldn't cost them their submission
    notifier.do_send(NewSubmission(contact.clone()));

    Ok(HttpResponse::Created().json(&contact))
}

/// Pulls the requested status out of an update body. Anything short of
/// `{"status": "<known status>"}` (no body, bad JSON, a non-string status) is `None`.
fn requested_status(body: &[u8]) -> Option<ServingStatus> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()?
        .get("status")?
        .as_str()?
        .parse()
        .ok()
}

#[post("/contacts/update_status/{id}/")]
/// Moves a contact into the requested serving status and returns it. An unknown
/// contact is reported before a bad status, whatever the body looks like.
pub async fn update_status(
    id: web::Path<u64>,
    body: web::Bytes,
    store: web::Data<Addr<Store>>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing update_status request");

    let id = ContactId(id.into_inner());
    let not_found = || ServiceError::not_found("Contact not found");

    if store.send(GetContact(id)).await?.is_none() {
        return Err(not_found());
    }

    let status =
        requested_status(&body).ok_or_else(|| ServiceError::bad_request("Invalid status"))?;

    let contact = store.send(SetStatus(id, status)).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(contact))
}

#[cfg(test)]
mod test {
    use crate::{
        config::Config,
        contact::{Contact, ContactId, ServingStatus},
        notify::{Notifier, SentCount},
        store::Store,
    };
    use actix::Actor;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    fn ada() -> serde_json::Value {
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "service": "consulting",
            "description": "Need advice",
        })
    }

    #[actix_rt::test]
    async fn submit_list_and_update() {
        drop(pretty_env_logger::try_init());

        let store = Store::new().start();
        let notifier = Notifier::new(&Config::default()).start();
        let mut app = test::init_service(
            App::new()
                .app_data(super::json_config())
                .data(store)
                .data(notifier.clone())
                .service(actix_web::web::scope("/api").configure(super::configure)),
        )
        .await;

        // submit ada twice
        let mut created = vec![];
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/contacts/submit/")
                .set_json(&ada())
                .to_request();
            let res = test::call_service(&mut app, req).await;
            assert_eq!(res.status(), StatusCode::CREATED);

            let contact: Contact =
                serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
            assert_eq!(contact.serving_status, ServingStatus::Initial);
            created.push(contact);
        }
        assert_ne!(created[0].id, created[1].id, "each submission gets its own id");
        assert_eq!(
            notifier.send(SentCount).await.expect("notifier gone"),
            2,
            "the admin should hear about every submission"
        );

        // mark the first one done
        let req = test::TestRequest::post()
            .uri(&format!("/api/contacts/update_status/{}/", created[0].id))
            .set_json(&json!({ "status": "done" }))
            .to_request();
        let updated: Contact = test::read_response_json(&mut app, req).await;
        assert_eq!(updated.id, created[0].id);
        assert_eq!(updated.serving_status, ServingStatus::Done);

        // only the first shows up under done
        let req = test::TestRequest::get()
            .uri("/api/contacts/?status=done")
            .to_request();
        let done: Vec<Contact> = test::read_response_json(&mut app, req).await;
        assert_eq!(
            done.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![created[0].id]
        );

        // nobody's been ignored
        let req = test::TestRequest::get()
            .uri("/api/contacts/?status=ignore")
            .to_request();
        let ignored: Vec<Contact> = test::read_response_json(&mut app, req).await;
        assert!(ignored.is_empty());

        // no filter lists both, newest first
        for uri in &["/api/contacts/", "/api/contacts/?status="] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let all: Vec<Contact> = test::read_response_json(&mut app, req).await;
            assert_eq!(
                all.iter().map(|c| c.id).collect::<Vec<_>>(),
                vec![created[1].id, created[0].id],
                "{} should list every contact",
                uri
            );
        }

        // a status that doesn't exist matches nobody
        let req = test::TestRequest::get()
            .uri("/api/contacts/?status=finished")
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let none: Vec<Contact> =
            serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
        assert!(none.is_empty());
    }

    #[actix_rt::test]
    async fn rejects_invalid_submissions() {
        drop(pretty_env_logger::try_init());

        let notifier = Notifier::new(&Config::default()).start();
        let mut app = test::init_service(
            App::new()
                .app_data(super::json_config())
                .data(Store::new().start())
                .data(notifier.clone())
                .configure(super::configure),
        )
        .await;

        let mut draft = ada();
        draft["email"] = json!("not-an-email");
        draft["service"] = json!("other");
        draft["other_service"] = json!("  ");

        let req = test::TestRequest::post()
            .uri("/contacts/submit/")
            .set_json(&draft)
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let errors: serde_json::Value =
            serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
        assert_eq!(
            errors,
            json!({
                "email": "Email is invalid",
                "other_service": "Please specify the service",
            })
        );
        assert_eq!(notifier.send(SentCount).await.expect("notifier gone"), 0);
    }

    #[actix_rt::test]
    async fn unselected_service_is_a_field_error() {
        drop(pretty_env_logger::try_init());

        let mut app = test::init_service(
            App::new()
                .app_data(super::json_config())
                .data(Store::new().start())
                .data(Notifier::new(&Config::default()).start())
                .configure(super::configure),
        )
        .await;

        // the form sends an empty string until a service is picked
        let mut draft = ada();
        draft["service"] = json!("");

        let req = test::TestRequest::post()
            .uri("/contacts/submit/")
            .set_json(&draft)
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let errors: serde_json::Value =
            serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
        assert_eq!(errors, json!({ "service": "Please select a service" }));

        // a service nobody offers, or a body that isn't JSON, still gets a JSON error
        draft["service"] = json!("plumbing");
        let unparseable = vec![
            test::TestRequest::post().set_json(&draft),
            test::TestRequest::post()
                .header("content-type", "application/json")
                .set_payload("{ not json"),
        ];
        for req in unparseable {
            let req = req.uri("/contacts/submit/").to_request();
            let res = test::call_service(&mut app, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            let body: serde_json::Value =
                serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
            assert!(
                body["error"].as_str().map_or(false, |e| e.starts_with("Invalid JSON")),
                "expected a JSON error body, got {}",
                body
            );
        }
    }

    #[actix_rt::test]
    async fn update_status_errors() {
        drop(pretty_env_logger::try_init());

        let mut app = test::init_service(
            App::new()
                .app_data(super::json_config())
                .data(Store::new().start())
                .data(Notifier::new(&Config::default()).start())
                .configure(super::configure),
        )
        .await;

        // nobody to update yet
        let req = test::TestRequest::post()
            .uri("/contacts/update_status/7/")
            .set_json(&json!({ "status": "done" }))
            .to_request();
        let res = test::call_service(&mut app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value =
            serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
        assert_eq!(body, json!({ "error": "Contact not found" }));

        // an unknown contact is still unknown, however bad the body is
        let bad_bodies = vec![
            test::TestRequest::post().set_json(&json!({ "status": 5 })),
            test::TestRequest::post(),
            test::TestRequest::post().set_payload("{ not json"),
        ];
        for req in bad_bodies {
            let req = req.uri("/contacts/update_status/7/").to_request();
            let res = test::call_service(&mut app, req).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
            let body: serde_json::Value =
                serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
            assert_eq!(body, json!({ "error": "Contact not found" }));
        }

        let req = test::TestRequest::post()
            .uri("/contacts/submit/")
            .set_json(&ada())
            .to_request();
        let ada: Contact = test::read_response_json(&mut app, req).await;
        assert_eq!(ada.id, ContactId(1));

        for bad in &[
            json!({ "status": "finished" }),
            json!({ "status": 5 }),
            json!({}),
        ] {
            let req = test::TestRequest::post()
                .uri("/contacts/update_status/1/")
                .set_json(bad)
                .to_request();
            let res = test::call_service(&mut app, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{} should be rejected", bad);
            let body: serde_json::Value =
                serde_json::from_slice(&test::read_body(res).await).expect("bad json body");
            assert_eq!(body, json!({ "error": "Invalid status" }));
        }
    }
}
