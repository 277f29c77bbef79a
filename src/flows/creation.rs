//! Ticket creation: `Editing → Submitting → LinkReady`, with `Failed` for
//! rejected or unreachable creates.

use crate::domain::ticket::{NewTicket, Ticket};
use crate::domain::types::TicketId;
use crate::flows::{Toast, failure_message};
use crate::forms::FieldErrors;
use crate::forms::ticket::TicketForm;
use crate::repository::CreatedTicket;
use crate::repository::errors::RepositoryResult;

#[derive(Clone, Debug, PartialEq)]
pub enum CreationFlow {
    Editing {
        form: TicketForm,
        errors: FieldErrors,
    },
    /// A create call is in flight; further submits are ignored.
    Submitting {
        form: TicketForm,
        payload: NewTicket,
    },
    LinkReady(LinkReady),
    Failed {
        form: TicketForm,
        message: String,
    },
}

impl Default for CreationFlow {
    fn default() -> Self {
        Self::editing(TicketForm::default())
    }
}

impl CreationFlow {
    /// Editing state with the form validated immediately.
    pub fn editing(form: TicketForm) -> Self {
        let errors = form.field_errors();
        CreationFlow::Editing { form, errors }
    }

    /// Moves a valid form into `Submitting`. Invalid forms stay in `Editing`
    /// with their errors; any other state is returned unchanged.
    pub fn submit(self) -> Self {
        match self {
            CreationFlow::Editing { form, .. } | CreationFlow::Failed { form, .. } => {
                match form.to_new_ticket() {
                    Ok(payload) => CreationFlow::Submitting { form, payload },
                    Err(_) => Self::editing(form),
                }
            }
            other => other,
        }
    }

    /// Payload to send while `Submitting`.
    pub fn payload(&self) -> Option<&NewTicket> {
        match self {
            CreationFlow::Submitting { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, CreationFlow::Submitting { .. })
    }

    /// Settles an in-flight create. `page_url` is the URL of the creation
    /// page, from which the shareable link is derived.
    pub fn finish(self, result: RepositoryResult<CreatedTicket>, page_url: &str) -> Self {
        let CreationFlow::Submitting { form, .. } = self else {
            return self;
        };

        match result {
            Ok(created) => CreationFlow::LinkReady(LinkReady::new(created, page_url)),
            Err(err) => CreationFlow::Failed {
                form,
                message: failure_message(&err, "Não foi possível criar a etiqueta. Tente novamente."),
            },
        }
    }

    /// Name used by templates to pick the section to render.
    pub fn state_name(&self) -> &'static str {
        match self {
            CreationFlow::Editing { .. } => "editing",
            CreationFlow::Submitting { .. } => "submitting",
            CreationFlow::LinkReady(_) => "link_ready",
            CreationFlow::Failed { .. } => "failed",
        }
    }
}

/// Created ticket with its shareable client-fill link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkReady {
    pub ticket: Ticket,
    pub link: String,
    pub toast: Toast,
}

impl LinkReady {
    pub fn new(created: CreatedTicket, page_url: &str) -> Self {
        let link = share_link(page_url, &created.ticket.id);
        let message = if created.message.trim().is_empty() {
            "Etiqueta criada com sucesso!".to_string()
        } else {
            created.message
        };

        Self {
            ticket: created.ticket,
            link,
            toast: Toast::success(message),
        }
    }
}

/// Replaces the `form` path segment of `page_url` with `client/{id}`;
/// appends it when the page URL has no such segment.
pub fn share_link(page_url: &str, id: &TicketId) -> String {
    let base = page_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let target = format!("client/{id}");

    match base.rfind("/form") {
        Some(pos) if base[pos + 5..].is_empty() || base[pos + 5..].starts_with('/') => {
            format!("{}/{}{}", &base[..pos], target, &base[pos + 5..])
        }
        _ => format!("{base}/{target}"),
    }
}
