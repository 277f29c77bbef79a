//! Services orchestrating flows and repository calls for the routes.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::{FieldErrors, FormError};
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod client_form;
pub mod ticket_form;
pub mod tickets;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("form error: {0}")]
    Form(String),

    /// Errors attached to individual form fields.
    #[error("invalid fields: {0:?}")]
    FieldErrors(FieldErrors),

    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
