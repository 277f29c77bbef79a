//! Operator sign-in.

use validator::Validate;

use crate::domain::auth::{LoginOutcome, Session};
use crate::forms::{FieldErrors, field_errors};
use crate::forms::login::LoginForm;
use crate::repository::Authenticator;
use crate::services::{ServiceError, ServiceResult};

/// Validates the login form and authenticates against the API. Credential
/// rejections come back as [`ServiceError::FieldErrors`] on `email` or
/// `password`.
pub async fn sign_in<R>(repo: &R, form: LoginForm) -> ServiceResult<Session>
where
    R: Authenticator + ?Sized,
{
    let form = LoginForm {
        email: form.email.trim().to_lowercase(),
        ..form
    };
    if let Err(errors) = form.validate() {
        return Err(ServiceError::FieldErrors(field_errors(&errors)));
    }

    let email = form.email.as_str();
    match repo.login(email, &form.password_md5()).await? {
        LoginOutcome::Authenticated(session) => {
            log::info!("Operator {} signed in", session.email);
            Ok(session)
        }
        LoginOutcome::Rejected(rejection) => {
            log::info!("Sign-in refused for {email}: {}", rejection.message);
            let mut errors = FieldErrors::new();
            errors.insert(rejection.field.name().to_string(), rejection.message);
            Err(ServiceError::FieldErrors(errors))
        }
    }
}
