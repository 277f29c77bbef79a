use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger, from_fn};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::middleware::redirect_unauthorized;
use crate::models::config::ServerConfig;
use crate::repository::{CepLookup, HttpRepository};
use crate::routes::api::api_check_document;
use crate::routes::auth::{login, logout, show_login};
use crate::routes::client_form::{show_client_form, submit_client_form};
use crate::routes::ticket_form::{show_ticket_form, submit_ticket_form};
use crate::routes::tickets::{
    show_ticket_details, show_tickets, update_ticket_status, update_tickets_status,
};

pub mod domain;
pub mod dto;
pub mod flows;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo = HttpRepository::new(&server_config.api_url)
        .map_err(|e| std::io::Error::other(format!("Failed to build ticket API client: {e}")))?;
    let cep_lookup = CepLookup::new(&server_config.cep_api_url)
        .map_err(|e| std::io::Error::other(format!("Failed to build postal-code client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        repo.base_url()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(web::scope("/api").service(api_check_document))
            .service(show_login)
            .service(login)
            .service(show_client_form)
            .service(submit_client_form)
            .service(
                web::scope("")
                    .wrap(from_fn(redirect_unauthorized))
                    .service(show_ticket_form)
                    .service(submit_ticket_form)
                    .service(show_tickets)
                    .service(update_tickets_status)
                    .service(show_ticket_details)
                    .service(update_ticket_status)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(cep_lookup.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
