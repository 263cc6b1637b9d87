use actix::Actor;
use actix_web::{web, App, HttpServer};
use contact_desk::{notify::Notifier, routes, store::Store, Config};

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    log::info!("contacts API listening on {}", config.bind);

    let store = Store::new().start();
    let notifier = Notifier::new(&config).start();

    HttpServer::new(move || {
        App::new().app_data(routes::json_config()).service(
            web::scope("/api")
                .data(store.clone())
                .data(notifier.clone())
                .configure(routes::configure),
        )
    })
    .bind(config.bind)?
    .run()
    .await
}
