//! Form definitions backing the ticket routes.

use std::borrow::Cow;
use std::collections::BTreeMap;

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::domain::types::TypeConstraintError;

pub mod client;
pub mod login;
pub mod ticket;

/// Field name → first error message, rendered next to the field.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid field {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: TypeConstraintError,
    },
}

/// Flattens `validator` output into one message per field.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .filter_map(|(field, errors)| {
            errors.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect()
}

/// Builds a [`ValidationError`] carrying a user-facing message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
