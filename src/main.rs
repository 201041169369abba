// huginn-service/src/main.rs
use std::env;
use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use huginn_service::routes::{grant_routes, invitation_routes, link_routes, notification_routes};
use huginn_service::services::{
    AccessGrantStore, InvitationWorkflow, LinkAccessController, NotificationDispatcher,
};
use huginn_service::storage::Storage;
use huginn_service::utils::Authentication;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:9090".to_string());
    let storage_root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());

    // The storage handle is opened once here and injected into every
    // component; its lifetime is the lifetime of the process.
    let storage = Arc::new(
        Storage::open(&storage_root)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let notifications = NotificationDispatcher::new(storage.clone());
    let grants = AccessGrantStore::new(storage.clone());
    let invitations = InvitationWorkflow::new(storage.clone(), grants.clone(), notifications.clone());
    let links = LinkAccessController::new(storage.clone(), notifications.clone());

    info!("Starting huginn-service at {}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(grants.clone()))
            .app_data(web::Data::new(invitations.clone()))
            .app_data(web::Data::new(links.clone()))
            .app_data(web::Data::new(notifications.clone()))
            // Share links are public entry points; everything else
            // requires a signed-in principal
            .service(web::scope("/public").configure(link_routes::init_public_routes))
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(grant_routes::init_routes)
                    .configure(invitation_routes::init_routes)
                    .configure(link_routes::init_routes)
                    .configure(notification_routes::init_routes),
            )
    })
    .bind(address)?
    .run()
    .await
}
