//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::flows::{Severity, TOAST_DISMISS_MS, Toast};
use crate::models::auth::Operator;

pub mod api;
pub mod auth;
pub mod client_form;
pub mod ticket_form;
pub mod tickets;

/// Maps a flash level to the CSS alert class used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Error => "danger",
    }
}

#[derive(Serialize)]
struct Alert {
    message: String,
    level: &'static str,
}

/// Context every page starts from: pending flash alerts, the active page and
/// the signed-in operator, if any.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    operator: Option<&Operator>,
) -> Context {
    base_context_with_toast(flash_messages, current_page, operator, None)
}

/// Like [`base_context`], with an extra toast produced by the current request.
pub fn base_context_with_toast(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    operator: Option<&Operator>,
    toast: Option<&Toast>,
) -> Context {
    let mut alerts = flash_messages
        .iter()
        .map(|f| Alert {
            message: f.content().to_string(),
            level: alert_level_to_str(&f.level()),
        })
        .collect::<Vec<_>>();
    if let Some(toast) = toast {
        alerts.push(Alert {
            message: toast.message.clone(),
            level: severity_to_str(toast.severity),
        });
    }

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("toast_dismiss_ms", &TOAST_DISMISS_MS);
    context.insert("current_page", current_page);
    context.insert("current_user", &operator);
    context
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Local path `prefix/{segment}` with `segment` percent-encoded.
pub fn segment_path(prefix: &str, segment: &str) -> String {
    match reqwest::Url::parse("http://localhost").and_then(|base| base.join(prefix)) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(segment);
            }
            url.path().to_string()
        }
        Err(_) => format!("{prefix}/{segment}"),
    }
}

/// Renders `template` as an HTML response, logging template failures.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
