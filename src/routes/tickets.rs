use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::ticket::StatusFilter;
use crate::domain::types::TicketId;
use crate::dto::tickets::TicketSummaryView;
use crate::flows::board::{BulkOutcome, BulkUpdate};
use crate::models::auth::Operator;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template, segment_path};
use crate::services::ServiceError;
use crate::services::tickets::{
    bulk_update_status, load_board, load_ticket_details, set_ticket_pending,
};

#[derive(Deserialize)]
struct BoardQueryParams {
    #[serde(default)]
    filter: StatusFilter,
}

/// Bulk action posted from the board; `ids` repeats once per checked row.
#[derive(Deserialize)]
struct BulkStatusForm {
    #[serde(default)]
    ids: Vec<String>,
    pending: bool,
    #[serde(default)]
    filter: StatusFilter,
}

#[derive(Deserialize)]
struct StatusForm {
    pending: bool,
}

fn board_path(filter: StatusFilter) -> String {
    match filter {
        StatusFilter::All => "/tickets".to_string(),
        StatusFilter::Pending => "/tickets?filter=pending".to_string(),
        StatusFilter::Created => "/tickets?filter=created".to_string(),
    }
}

fn send_bulk_flash(outcome: &BulkOutcome) {
    let target = if outcome.target_pending { "pendentes" } else { "geradas" };
    let message = if outcome.is_complete_success() {
        FlashMessage::success(format!(
            "{} etiqueta(s) marcada(s) como {target}.",
            outcome.updated.len()
        ))
    } else {
        FlashMessage::error(format!(
            "{} de {} etiqueta(s) não foram atualizadas.",
            outcome.failed.len(),
            outcome.failed.len() + outcome.updated.len()
        ))
    };
    message.send();
}

#[get("/tickets")]
pub async fn show_tickets(
    operator: Operator,
    params: web::Query<BoardQueryParams>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_board(repo.get_ref(), params.filter).await {
        Ok(page) => {
            let mut context = base_context(&flash_messages, "tickets", Some(&operator));
            context.insert("board", &page);
            render_template(&tera, "tickets/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render ticket board: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Applies the bulk action, then sends the browser back to a fresh board
/// where rows whose update failed show their stored status.
#[post("/tickets/status")]
pub async fn update_tickets_status(
    _operator: Operator,
    body: String,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    let form: BulkStatusForm = match serde_html_form::from_str(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed bulk status form: {err}");
            FlashMessage::error("Seleção inválida.".to_string()).send();
            return redirect("/tickets");
        }
    };

    let update = BulkUpdate::new(
        form.ids.into_iter().filter_map(|id| TicketId::new(id).ok()),
        form.pending,
    );
    if update.is_empty() {
        FlashMessage::error("Selecione ao menos uma etiqueta.".to_string()).send();
        return redirect(&board_path(form.filter));
    }

    let outcome = bulk_update_status(repo.get_ref(), update).await;
    send_bulk_flash(&outcome);
    redirect(&board_path(form.filter))
}

#[get("/ticket-details/{ticket_id}")]
pub async fn show_ticket_details(
    operator: Operator,
    ticket_id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let ticket = match load_ticket_details(repo.get_ref(), &ticket_id).await {
        Ok(ticket) => ticket,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Etiqueta não encontrada.".to_string()).send();
            return redirect("/tickets");
        }
        Err(err) => {
            log::error!("Failed to load ticket details: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, "tickets", Some(&operator));
    context.insert("ticket", &TicketSummaryView::from(&ticket));
    render_template(&tera, "tickets/details.html", &context)
}

#[post("/ticket-details/{ticket_id}/status")]
pub async fn update_ticket_status(
    _operator: Operator,
    ticket_id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let ticket_id = ticket_id.into_inner();
    match set_ticket_pending(repo.get_ref(), &ticket_id, form.pending).await {
        Ok(_) => {
            let label = if form.pending { "pendente" } else { "gerada" };
            FlashMessage::success(format!("Etiqueta marcada como {label}.")).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Etiqueta não encontrada.".to_string()).send();
            return redirect("/tickets");
        }
        Err(err) => {
            log::error!("Failed to update ticket {ticket_id}: {err}");
            FlashMessage::error("Não foi possível atualizar a etiqueta.".to_string()).send();
        }
    }
    redirect(&segment_path("/ticket-details", &ticket_id))
}
