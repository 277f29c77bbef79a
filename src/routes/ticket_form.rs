use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::{Context, Tera};

use crate::domain::types::Carrier;
use crate::dto::tickets::TicketSummaryView;
use crate::flows::Toast;
use crate::flows::creation::CreationFlow;
use crate::forms::FieldErrors;
use crate::forms::ticket::{NO_CARRIER, TicketForm};
use crate::models::auth::Operator;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{base_context_with_toast, render_template};
use crate::services::ticket_form::create_ticket;

/// Field errors are only shown once the operator tried to submit.
fn creation_context(
    flow: &CreationFlow,
    operator: &Operator,
    flash_messages: &IncomingFlashMessages,
    show_errors: bool,
) -> Context {
    let no_errors = FieldErrors::new();
    let toast = match flow {
        CreationFlow::LinkReady(ready) => Some(ready.toast.clone()),
        CreationFlow::Failed { message, .. } => Some(Toast::error(message.clone())),
        _ => None,
    };

    let mut context =
        base_context_with_toast(flash_messages, "form", Some(operator), toast.as_ref());
    context.insert("state", flow.state_name());
    context.insert("busy", &flow.is_busy());
    context.insert("no_carrier", NO_CARRIER);
    let carriers: Vec<_> = Carrier::ALL
        .iter()
        .map(|carrier| (carrier.label(), carrier.label()))
        .collect();
    context.insert("carriers", &carriers);

    match flow {
        CreationFlow::Editing { form, errors } => {
            context.insert("form", form);
            context.insert("errors", if show_errors { errors } else { &no_errors });
        }
        CreationFlow::Submitting { form, .. } | CreationFlow::Failed { form, .. } => {
            context.insert("form", form);
            context.insert("errors", &no_errors);
        }
        CreationFlow::LinkReady(ready) => {
            context.insert("summary", &TicketSummaryView::from(&ready.ticket));
            context.insert("link", &ready.link);
        }
    }
    context
}

#[get("/form")]
pub async fn show_ticket_form(
    operator: Operator,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let flow = CreationFlow::default();
    let context = creation_context(&flow, &operator, &flash_messages, false);
    render_template(&tera, "ticket_form/index.html", &context)
}

#[post("/form")]
pub async fn submit_ticket_form(
    operator: Operator,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<TicketForm>,
) -> impl Responder {
    let flow = create_ticket(repo.get_ref(), form, &server_config.form_page_url()).await;
    let context = creation_context(&flow, &operator, &flash_messages, true);
    render_template(&tera, "ticket_form/index.html", &context)
}
