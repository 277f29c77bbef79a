use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::ticket::{Ticket, TicketFill};
use crate::domain::types::{Document, DocumentKind, PostalCode, digits_only};
use crate::forms::{FieldErrors, FormError, field_errors, invalid};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
/// Personal and address data filled in by the end customer.
pub struct ClientFillForm {
    /// Which of `cpf`/`cnpj` is active.
    #[serde(default)]
    pub document_kind: DocumentKind,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe seu nome completo"))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe um email"),
        custom(function = "validate_email_format")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe seu CEP"),
        custom(function = "validate_postal_code")
    )]
    pub cep: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe o nome da rua"))]
    pub street: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe um número"))]
    pub number: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe um bairro"))]
    pub neighborhood: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe uma cidade"))]
    pub city: String,
    #[serde(default)]
    pub complement: String,
}

fn validate_email_format(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.trim().validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Informe um email válido"))
    }
}

fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || PostalCode::new(value).is_ok() {
        Ok(())
    } else {
        Err(invalid("cep", "CEP inválido"))
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ClientFillForm {
    /// Pre-populates the form from a fetched ticket, picking the document
    /// field by the stored document length.
    pub fn from_ticket(ticket: &Ticket) -> Self {
        let document = ticket.document.clone().unwrap_or_default();
        let document_kind = ticket.document_kind().unwrap_or_default();
        let (cpf, cnpj) = match ticket.document_kind() {
            Some(DocumentKind::Cpf) => (document, String::new()),
            Some(DocumentKind::Cnpj) => (String::new(), document),
            None => (String::new(), String::new()),
        };

        Self {
            document_kind,
            cpf,
            cnpj,
            name: ticket.name.clone().unwrap_or_default(),
            phone: ticket.phone.clone().unwrap_or_default(),
            email: ticket.email.clone().unwrap_or_default(),
            cep: ticket.cep.clone().unwrap_or_default(),
            street: ticket.street.clone().unwrap_or_default(),
            number: ticket.number.clone().unwrap_or_default(),
            neighborhood: ticket.neighborhood.clone().unwrap_or_default(),
            city: ticket.city.clone().unwrap_or_default(),
            complement: ticket.complement.clone().unwrap_or_default(),
        }
    }

    /// Raw value of the active document field.
    pub fn active_document(&self) -> &str {
        match self.document_kind {
            DocumentKind::Cpf => &self.cpf,
            DocumentKind::Cnpj => &self.cnpj,
        }
    }

    /// Switches the active document variant, clearing the other field.
    pub fn set_document_kind(&mut self, kind: DocumentKind) {
        self.document_kind = kind;
        match kind {
            DocumentKind::Cpf => self.cnpj.clear(),
            DocumentKind::Cnpj => self.cpf.clear(),
        }
    }

    /// Validation errors keyed by field; empty when the form can be submitted.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => field_errors(&errors),
        };

        let kind = self.document_kind;
        let raw = self.active_document();
        if raw.trim().is_empty() {
            errors.insert(kind.field().to_string(), format!("Informe um {}", kind.label()));
        } else if !kind.is_complete(raw) {
            errors.insert(kind.field().to_string(), format!("{} inválido", kind.label()));
        }

        errors
    }

    /// Converts the validated form into the fill payload.
    pub fn to_fill(&self) -> Result<TicketFill, FormError> {
        self.validate()?;

        let document = Document::parse(self.active_document()).map_err(|source| {
            FormError::InvalidField {
                field: self.document_kind.field(),
                source,
            }
        })?;
        let cep = PostalCode::new(&self.cep)
            .map_err(|source| FormError::InvalidField { field: "cep", source })?;
        let phone = Some(digits_only(&self.phone)).filter(|digits| !digits.is_empty());

        Ok(TicketFill {
            document,
            name: self.name.trim().to_string(),
            phone,
            email: self.email.trim().to_string(),
            cep,
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            neighborhood: self.neighborhood.trim().to_string(),
            city: self.city.trim().to_string(),
            complement: non_blank(&self.complement),
        })
    }
}
