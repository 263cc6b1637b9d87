//! Stands up real backends for the client's tests to talk to.
use crate::{config::Config, notify::Notifier, routes, store::Store};
use actix::Actor;
use actix_web::{web, App, HttpServer};

/// Starts a backend with an empty store on an ephemeral port, returning its API base URL.
/// Must be called from within a running actix system.
pub fn serve() -> String {
    // attempt to establish logging, do nothing if it fails
    // (it probably fails because it's already been established in another test)
    drop(pretty_env_logger::try_init());

    let store = Store::new().start();
    let notifier = Notifier::new(&Config::default()).start();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(routes::json_config())
            .data(store.clone())
            .data(notifier.clone())
            .service(web::scope("/api").configure(routes::configure))
    })
    .workers(1)
    .bind("127.0.0.1:0")
    .expect("couldn't bind an ephemeral port");

    let addr = server.addrs()[0];
    tokio::spawn(server.run());

    format!("http://{}/api", addr)
}

/// A URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("couldn't bind");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);

    format!("http://{}/api", addr)
}
