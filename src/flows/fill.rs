//! Client fill: `Loading → NotFound | AlreadyFilled | Editing → Submitting →
//! Done`. A rejected save is `SaveRejected`, distinct from a missing ticket,
//! and a load that never reached the API is `LoadFailed`.

use crate::domain::address::Address;
use crate::domain::ticket::{Ticket, TicketFill};
use crate::domain::types::{Document, DocumentKind, PostalCode, TicketId};
use crate::flows::failure_message;
use crate::forms::FieldErrors;
use crate::forms::client::ClientFillForm;
use crate::repository::DocumentValidation;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Message shown when the ticket does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Dados não encontrados.";
/// Message shown when the client already submitted the form.
pub const ALREADY_FILLED_MESSAGE: &str = "Obrigado! Você já enviou este formulário.";

#[derive(Clone, Debug, PartialEq)]
pub enum FillFlow {
    NotFound,
    AlreadyFilled,
    LoadFailed { message: String },
    Editing(FillEditor),
    /// The update call is in flight; further submits are ignored.
    Submitting(FillEditor),
    Done { message: String },
    SaveRejected { editor: FillEditor, message: String },
}

impl FillFlow {
    /// Resolves the `Loading` state from the ticket lookup.
    pub fn resolve(lookup: RepositoryResult<Option<Ticket>>) -> Self {
        match lookup {
            Ok(None) | Err(RepositoryError::NotFound) => FillFlow::NotFound,
            Ok(Some(ticket)) if ticket.filled => FillFlow::AlreadyFilled,
            Ok(Some(ticket)) => FillFlow::Editing(FillEditor::from_ticket(&ticket)),
            Err(err) => FillFlow::LoadFailed {
                message: failure_message(&err, "Não foi possível carregar os dados. Tente novamente."),
            },
        }
    }

    pub fn editor(&self) -> Option<&FillEditor> {
        match self {
            FillFlow::Editing(editor)
            | FillFlow::Submitting(editor)
            | FillFlow::SaveRejected { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut FillEditor> {
        match self {
            FillFlow::Editing(editor) | FillFlow::SaveRejected { editor, .. } => Some(editor),
            _ => None,
        }
    }

    /// Replaces the editor's values with freshly posted ones, keeping the
    /// ticket the editor belongs to.
    pub fn with_form(self, form: ClientFillForm) -> Self {
        match self {
            FillFlow::Editing(editor) | FillFlow::SaveRejected { editor, .. } => {
                FillFlow::Editing(FillEditor::new(editor.ticket_id, form))
            }
            other => other,
        }
    }

    /// Moves a submittable editor into `Submitting`; otherwise stays put with
    /// the errors refreshed.
    pub fn submit(self) -> Self {
        match self {
            FillFlow::Editing(mut editor) | FillFlow::SaveRejected { mut editor, .. } => {
                editor.revalidate();
                if editor.can_submit() {
                    FillFlow::Submitting(editor)
                } else {
                    FillFlow::Editing(editor)
                }
            }
            other => other,
        }
    }

    /// Gives up on a submission attempt that failed before the update call,
    /// keeping the editor for a retry.
    pub fn abort(self, err: &RepositoryError) -> Self {
        match self {
            FillFlow::Editing(editor) | FillFlow::SaveRejected { editor, .. } => {
                FillFlow::SaveRejected {
                    editor,
                    message: failure_message(err, "Não foi possível validar o documento. Tente novamente."),
                }
            }
            other => other,
        }
    }

    /// Payload for the in-flight update.
    pub fn payload(&self) -> Option<TicketFill> {
        match self {
            FillFlow::Submitting(editor) => editor.form.to_fill().ok(),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, FillFlow::Submitting(_))
    }

    /// Settles the in-flight update.
    pub fn finish(self, result: RepositoryResult<String>) -> Self {
        let FillFlow::Submitting(editor) = self else {
            return self;
        };

        match result {
            Ok(message) if message.trim().is_empty() => FillFlow::Done {
                message: "Dados enviados com sucesso!".to_string(),
            },
            Ok(message) => FillFlow::Done { message },
            Err(err) => FillFlow::SaveRejected {
                editor,
                message: failure_message(&err, "Não foi possível salvar os dados. Tente novamente."),
            },
        }
    }

    /// Name used by templates to pick the section to render.
    pub fn state_name(&self) -> &'static str {
        match self {
            FillFlow::NotFound => "not_found",
            FillFlow::AlreadyFilled => "already_filled",
            FillFlow::LoadFailed { .. } => "load_failed",
            FillFlow::Editing(_) => "editing",
            FillFlow::Submitting(_) => "submitting",
            FillFlow::Done { .. } => "done",
            FillFlow::SaveRejected { .. } => "save_rejected",
        }
    }
}

/// Editable fill form for one ticket.
#[derive(Clone, Debug, PartialEq)]
pub struct FillEditor {
    pub ticket_id: TicketId,
    pub form: ClientFillForm,
    pub errors: FieldErrors,
    /// Set when the API rejected the active document's checksum.
    document_rejected: bool,
}

impl FillEditor {
    pub fn new(ticket_id: TicketId, form: ClientFillForm) -> Self {
        let mut editor = Self {
            ticket_id,
            form,
            errors: FieldErrors::new(),
            document_rejected: false,
        };
        editor.revalidate();
        editor
    }

    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self::new(ticket.id.clone(), ClientFillForm::from_ticket(ticket))
    }

    /// Recomputes field errors, keeping a remote document rejection.
    pub fn revalidate(&mut self) {
        self.errors = self.form.field_errors();
        if self.document_rejected {
            let kind = self.form.document_kind;
            self.errors
                .insert(kind.field().to_string(), format!("{} inválido", kind.label()));
        }
    }

    /// Switches between CPF and CNPJ, clearing the previously active field.
    pub fn toggle_document_kind(&mut self, kind: DocumentKind) {
        self.form.set_document_kind(kind);
        self.document_rejected = false;
        self.revalidate();
    }

    /// Document worth validating remotely: only once the active field holds
    /// exactly the expected number of digits.
    pub fn document_to_validate(&self) -> Option<Document> {
        let raw = self.form.active_document();
        if !self.form.document_kind.is_complete(raw) {
            return None;
        }
        Document::parse(raw).ok()
    }

    /// Records the remote checksum verdict; returns whether the document is valid.
    pub fn apply_document_validation(&mut self, validation: &DocumentValidation) -> bool {
        self.document_rejected = !validation.valid;
        if validation.valid && !validation.formatted.is_empty() {
            let formatted = validation.formatted.clone();
            match self.form.document_kind {
                DocumentKind::Cpf => self.form.cpf = formatted,
                DocumentKind::Cnpj => self.form.cnpj = formatted,
            }
        }
        self.revalidate();
        validation.valid
    }

    /// Postal code worth looking up: only once it has exactly eight digits.
    pub fn postal_code_to_lookup(&self) -> Option<PostalCode> {
        PostalCode::new(&self.form.cep).ok()
    }

    /// Autofills the address from a lookup, overwriting whatever the client
    /// typed in street, neighborhood and city.
    pub fn apply_address(&mut self, address: Address) {
        self.form.street = address.street;
        self.form.neighborhood = address.neighborhood;
        self.form.city = address.city;
        self.revalidate();
    }

    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }
}
