use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::flows::Toast;
use crate::flows::fill::{ALREADY_FILLED_MESSAGE, FillFlow, NOT_FOUND_MESSAGE};
use crate::forms::FieldErrors;
use crate::forms::client::ClientFillForm;
use crate::repository::{CepLookup, HttpRepository};
use crate::routes::{base_context_with_toast, redirect, render_template, segment_path};
use crate::services::client_form::{
    autofill_address, load_fill_flow, submit_fill, switch_document_kind,
};

/// Which button posted the fill form. The CEP and document-kind buttons
/// re-render the form without saving it.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum FillIntent {
    #[default]
    Submit,
    LookupAddress,
    SwitchDocument,
}

#[derive(Deserialize)]
struct FillIntentField {
    #[serde(default)]
    intent: FillIntent,
}

/// Field errors are only shown once the client tried to submit.
fn fill_context(
    ticket_id: &str,
    flow: &FillFlow,
    flash_messages: &IncomingFlashMessages,
    show_errors: bool,
) -> Context {
    let toast = match flow {
        FillFlow::SaveRejected { message, .. } => Some(Toast::error(message.clone())),
        _ => None,
    };

    let mut context = base_context_with_toast(flash_messages, "client", None, toast.as_ref());
    context.insert("ticket_id", ticket_id);
    context.insert("state", flow.state_name());
    context.insert("busy", &flow.is_busy());

    match flow {
        FillFlow::NotFound => context.insert("message", NOT_FOUND_MESSAGE),
        FillFlow::AlreadyFilled => context.insert("message", ALREADY_FILLED_MESSAGE),
        FillFlow::LoadFailed { message } | FillFlow::Done { message } => {
            context.insert("message", message)
        }
        FillFlow::Editing(_) | FillFlow::Submitting(_) | FillFlow::SaveRejected { .. } => {}
    }
    if let Some(editor) = flow.editor() {
        context.insert("form", &editor.form);
        if show_errors {
            context.insert("errors", &editor.errors);
        } else {
            context.insert("errors", &FieldErrors::new());
        }
    }
    context
}

#[get("/client/{ticket_id}")]
pub async fn show_client_form(
    ticket_id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let ticket_id = ticket_id.into_inner();
    let flow = load_fill_flow(repo.get_ref(), &ticket_id).await;
    let context = fill_context(&ticket_id, &flow, &flash_messages, false);
    render_template(&tera, "client_form/index.html", &context)
}

#[post("/client/{ticket_id}")]
pub async fn submit_client_form(
    ticket_id: web::Path<String>,
    repo: web::Data<HttpRepository>,
    cep_lookup: web::Data<CepLookup>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: String,
) -> impl Responder {
    let ticket_id = ticket_id.into_inner();
    let (form, intent) = match (
        serde_html_form::from_str::<ClientFillForm>(&body),
        serde_html_form::from_str::<FillIntentField>(&body),
    ) {
        (Ok(form), Ok(field)) => (form, field.intent),
        (Err(err), _) | (_, Err(err)) => {
            log::warn!("Malformed fill form for ticket {ticket_id}: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    let flow = match intent {
        FillIntent::LookupAddress => {
            autofill_address(repo.get_ref(), cep_lookup.get_ref(), &ticket_id, form).await
        }
        FillIntent::SwitchDocument => switch_document_kind(repo.get_ref(), &ticket_id, form).await,
        FillIntent::Submit => submit_fill(repo.get_ref(), &ticket_id, form).await,
    };

    if let FillFlow::Done { message } = &flow {
        FlashMessage::success(message.clone()).send();
        return redirect(&segment_path("/client", &ticket_id));
    }

    let context = fill_context(&ticket_id, &flow, &flash_messages, intent == FillIntent::Submit);
    render_template(&tera, "client_form/index.html", &context)
}
